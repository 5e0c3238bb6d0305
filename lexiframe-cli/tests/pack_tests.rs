use std::fs;
use tempfile::tempdir;

use lexiframe_cli::commands::pack;
use lexiframe_core::{constants::FRAME_LEN, decode_buffer, DecodedRecord};

fn write_file<P: AsRef<std::path::Path>>(p: P, s: &str) {
    fs::write(p, s.as_bytes()).unwrap();
}

#[test]
fn pack_mixed_records() {
    let td = tempdir().unwrap();
    let in_path = td.path().join("in.json");
    let out_path = td.path().join("out.lxi");

    let input = r#"[
      {"kind":"science","capture_time":10.5,"timestamp_ticks":250,"commanded":true,"counts":[1,2,3,4]},
      {"kind":"housekeeping","capture_time":11.0,"channel_id":10,"value":291,"deltas":[1,2,3]},
      {"kind":"science","capture_time":11.5,"counts":[5,6,7,8]}
    ]"#;
    write_file(&in_path, input);

    pack::execute(in_path.to_str().unwrap(), out_path.to_str().unwrap()).unwrap();

    let bytes = fs::read(&out_path).unwrap();
    assert_eq!(bytes.len(), 3 * FRAME_LEN);

    let records = decode_buffer(&bytes);
    assert_eq!(records.len(), 3);

    let first = records[0].as_science().unwrap();
    assert_eq!(first.capture_time, 10.5);
    assert_eq!(first.timestamp_ticks, 250);
    assert!(first.is_commanded);

    let hk = records[1].as_housekeeping().unwrap();
    assert_eq!(hk.channel_id, 10);
    assert_eq!(hk.raw_value, 291);
    assert_eq!(hk.delta_dropped_count, 2);

    match &records[2] {
        DecodedRecord::Science(s) => {
            assert_eq!(s.timestamp_ticks, 0);
            assert!(!s.is_commanded);
        }
        other => panic!("expected science, got {:?}", other),
    }
}

#[test]
fn pack_empty_array_writes_empty_file() {
    let td = tempdir().unwrap();
    let in_path = td.path().join("empty.json");
    let out_path = td.path().join("empty.lxi");
    write_file(&in_path, "[]");

    pack::execute(in_path.to_str().unwrap(), out_path.to_str().unwrap()).unwrap();

    assert!(fs::read(&out_path).unwrap().is_empty());
}

#[test]
fn pack_rejects_out_of_range_channel() {
    let td = tempdir().unwrap();
    let in_path = td.path().join("bad.json");
    let out_path = td.path().join("bad.lxi");
    write_file(
        &in_path,
        r#"[{"kind":"housekeeping","capture_time":0.0,"channel_id":16,"value":1}]"#,
    );

    let err = pack::execute(in_path.to_str().unwrap(), out_path.to_str().unwrap()).unwrap_err();
    assert!(format!("{:#}", err).contains("channel"));
    assert!(!out_path.exists());
}

#[test]
fn pack_rejects_malformed_json() {
    let td = tempdir().unwrap();
    let in_path = td.path().join("bad.json");
    let out_path = td.path().join("bad.lxi");
    write_file(&in_path, r#"[{"kind":"telemetry"}]"#);

    assert!(pack::execute(in_path.to_str().unwrap(), out_path.to_str().unwrap()).is_err());
}
