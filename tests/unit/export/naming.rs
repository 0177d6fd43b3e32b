use chrono::TimeZone;

use super::*;

#[test]
fn export_names_embed_a_filesystem_safe_timestamp() {
    let at = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
    assert_eq!(
        export_file_name(OutputFormat::Png, at),
        "stitched-2024-03-09T14-05-07.png"
    );
    assert_eq!(
        export_file_name(OutputFormat::Jpeg, at),
        "stitched-2024-03-09T14-05-07.jpg"
    );
}

#[test]
fn export_names_drop_subsecond_precision() {
    let at = Utc
        .with_ymd_and_hms(2023, 12, 31, 23, 59, 59)
        .unwrap()
        .checked_add_signed(chrono::TimeDelta::milliseconds(987))
        .unwrap();
    assert_eq!(
        export_file_name(OutputFormat::Png, at),
        "stitched-2023-12-31T23-59-59.png"
    );
}

#[test]
fn batch_names_append_merged_suffix() {
    assert_eq!(
        batch_file_name("img1-2", OutputFormat::Jpeg),
        "img1-2-merged.jpg"
    );
    assert_eq!(
        batch_file_name("shot_3-4", OutputFormat::Png),
        "shot_3-4-merged.png"
    );
}
