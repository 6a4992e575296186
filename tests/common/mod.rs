#![allow(dead_code)]

use monetizer::domain::payer::PayerId;
use std::io::Write;
use tempfile::NamedTempFile;

pub fn payer(id: &str) -> PayerId {
    PayerId::from(id)
}

/// Destination address the replay tool's receiver would issue to `payer`.
pub fn destination(payer: &str) -> String {
    format!("private.replay.{payer}.c0.tag")
}

/// Writes a replay file with a header and the given `kind, target, amount` rows.
pub fn events_file(rows: &[(&str, &str, &str)]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "kind, target, amount").unwrap();
    for (kind, target, amount) in rows {
        writeln!(file, "{kind}, {target}, {amount}").unwrap();
    }
    file.flush().unwrap();
    file
}

/// Yields until `condition` holds.
pub async fn until(mut condition: impl FnMut() -> bool) {
    while !condition() {
        tokio::task::yield_now().await;
    }
}
