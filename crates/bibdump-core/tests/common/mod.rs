#![allow(dead_code)]

pub mod dump_server;

use flate2::write::GzEncoder;
use flate2::Compression;

/// Build a `.tar.gz` holding `members` (name, contents).
pub fn tar_gz(members: &[(&str, &[u8])]) -> Vec<u8> {
    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    for (name, data) in members {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, name, *data).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

/// Index JSON listing `urls` in order.
pub fn index_json(urls: &[String]) -> Vec<u8> {
    let records: Vec<serde_json::Value> = urls
        .iter()
        .map(|u| serde_json::json!({ "dump_file": u }))
        .collect();
    serde_json::to_vec(&serde_json::json!({
        "id": 12645,
        "files": { "bib_records": records }
    }))
    .unwrap()
}
