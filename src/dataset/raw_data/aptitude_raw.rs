/// Returns the raw Aptitude fixture as semicolon-separated text, header line first.
pub fn load_aptitude_raw_data() -> &'static str {
    r#"AptitudeTestScore;PreviousExperience_month;Pass
5;6;0
1;15;0
1;12;0
4;6;0
1;15;1
1;6;0
4;16;1
1;10;1
3;12;0
4;26;1
5;2;1
1;12;0
3;18;0
3;3;0
1;24;1
2;8;0
1;9;0
4;18;0
4;22;1
5;3;1
4;12;0
4;24;1
2;18;1
2;6;0
1;8;0
5;12;0
"#
}
