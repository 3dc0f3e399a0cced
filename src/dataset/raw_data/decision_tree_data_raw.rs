/// Returns the raw DecisionTreeData fixture as semicolon-separated text, header line first.
pub fn load_decision_tree_data_raw_data() -> &'static str {
    r#"F1;F2;T
1;0.409175;1.88318
1;0.182603;0.063908
1;0.663687;3.042257
1;0.517395;2.305004
1;0.013643;-0.067698
1;0.469643;1.662809
1;0.725426;3.275749
1;0.39435;1.118077
1;0.50776;2.095059
1;0.237395;1.181912
1;0.057534;0.221663
1;0.36982;0.938453
1;0.976819;4.149409
1;0.616051;3.105444
1;0.4137;1.896278
1;0.105279;-0.121345
1;0.670273;3.161652
1;0.952758;4.135358
1;0.272316;0.859063
1;0.303697;1.170272
1;0.486698;1.68796
1;0.51181;1.979745
1;0.195865;0.06869
1;0.986769;4.052137
1;0.785623;3.156316
1;0.797583;2.95063
1;0.081306;0.068935
1;0.659753;2.85402
1;0.37527;0.999743
1;0.819136;4.048082
1;0.142432;0.230923
1;0.215112;0.816693
1;0.04127;0.130713
1;0.044136;-0.537706
1;0.131337;-0.339109
1;0.463444;2.124538
1;0.671905;2.708292
1;0.946559;4.01739
1;0.904176;4.004021
1;0.306674;1.022555
1;0.819006;3.657442
1;0.845472;4.073619
1;0.156258;0.011994
1;0.857185;3.640429
1;0.400158;1.808497
1;0.375395;1.431404
1;0.885807;3.935544
1;0.23996;1.162152
1;0.14864;-0.22733
1;0.143143;-0.068728
1;0.321582;0.825051
1;0.509393;2.008645
1;0.355891;0.664566
1;0.938633;4.180202
1;0.348057;0.864845
1;0.438898;1.851174
1;0.781419;2.761993
1;0.911333;4.075914
1;0.032469;0.110229
1;0.499985;2.181987
1;0.771663;3.152528
1;0.670361;3.046564
1;0.176202;0.128954
1;0.39217;1.062726
1;0.911188;3.651742
1;0.872288;4.40195
1;0.733107;3.022888
1;0.610239;2.874917
1;0.732739;2.946801
1;0.714825;2.893644
1;0.076386;0.072131
1;0.559009;1.748275
1;0.427258;1.912047
1;0.841875;3.710686
1;0.558918;1.719148
1;0.533241;2.17409
1;0.956665;3.656357
1;0.620393;3.522504
1;0.56612;2.234126
1;0.523258;1.859772
1;0.476884;2.097017
1;0.176408;0.001794
1;0.303094;1.231928
1;0.609731;2.953862
1;0.017774;-0.116803
1;0.622616;2.638864
1;0.886539;3.943428
1;0.148654;-0.328513
1;0.10435;-0.099866
1;0.116868;-0.030836
1;0.516514;2.359786
1;0.664896;3.212581
1;0.004327;0.188975
1;0.425559;1.904109
1;0.743671;3.007114
1;0.935185;3.845834
1;0.6973;3.079411
1;0.444551;1.939739
1;0.683753;2.880078
1;0.755993;3.063577
1;0.90269;4.116296
1;0.094491;-0.240963
1;0.873831;4.066299
1;0.99181;4.011834
1;0.185611;0.07771
1;0.694551;3.103069
1;0.657275;2.811897
1;0.118746;-0.10463
1;0.084302;0.025216
1;0.945341;4.330063
1;0.785827;3.087091
1;0.530933;2.269988
1;0.879594;4.010701
1;0.65277;3.119542
1;0.879338;3.723411
1;0.764739;2.792078
1;0.504884;2.192787
1;0.554203;2.081305
1;0.493209;1.714463
1;0.363783;0.885854
1;0.316465;1.028187
1;0.580283;1.951497
1;0.542898;1.709427
1;0.112661;0.144068
1;0.816742;3.88024
1;0.234175;0.921876
1;0.402804;1.979316
1;0.709423;3.085768
1;0.867298;3.476122
1;0.993392;3.993679
1;0.71158;3.07788
1;0.133643;-0.105365
1;0.052031;-0.164703
1;0.366806;1.096814
1;0.697521;3.092879
1;0.787262;2.987926
1;0.47671;2.061264
1;0.721417;2.746854
1;0.230376;0.71671
1;0.104397;0.103831
1;0.197834;0.023776
1;0.129291;-0.033299
1;0.528528;1.942286
1;0.009493;-0.006338
1;0.998533;3.808753
1;0.363522;0.652799
1;0.901386;4.053747
1;0.832693;4.56929
1;0.119002;-0.032773
1;0.487638;2.066236
1;0.153667;0.222785
1;0.238619;1.089268
1;0.208197;1.487788
1;0.750921;2.852033
1;0.183403;0.024486
1;0.995608;3.73775
1;0.151311;0.045017
1;0.126804;0.001238
1;0.983153;3.892763
1;0.772495;2.819376
1;0.784133;2.830665
1;0.056934;0.234633
1;0.425584;1.810782
1;0.998709;4.237235
1;0.707815;3.034768
1;0.413816;1.742106
1;0.217152;1.16925
1;0.360503;0.831165
1;0.977989;3.729376
1;0.507953;1.823205
1;0.920771;4.02197
1;0.210542;1.262939
1;0.928611;4.159518
1;0.580373;2.039114
1;0.84139;4.101837
1;0.68153;2.778672
1;0.292795;1.228284
1;0.456918;1.73662
1;0.134128;-0.195046
1;0.016241;-0.063215
1;0.691214;3.305268
1;0.582002;2.063627
1;0.303102;0.89884
1;0.622598;2.701692
1;0.525024;1.992909
1;0.996775;3.811393
1;0.881025;4.353857
1;0.723457;2.635641
1;0.676346;2.856311
1;0.254625;1.352682
1;0.488632;2.336459
1;0.519875;2.111651
1;0.160176;0.121726
1;0.609483;3.264605
1;0.531881;2.103446
1;0.321632;0.896855
1;0.845148;4.22085
1;0.012003;-0.217283
1;0.018883;-0.300577
1;0.071476;0.006014
"#
}
