//! JSON and text rendering for the command output.

use chessbits_core::Move;
use chessbits_engine::PerftReport;
use serde::Serialize;

/// JSON representation of a divide run.
#[derive(Serialize)]
struct ReportJson<'a> {
    fen: &'a str,
    depth: u32,
    nodes: u64,
    time_ms: u128,
    nodes_per_second: u64,
    /// Root moves in sorted order.
    divide: Vec<DivideJson<'a>>,
}

#[derive(Serialize)]
struct DivideJson<'a> {
    #[serde(rename = "move")]
    mv: &'a str,
    nodes: u64,
}

/// Serializes a report for the position given by `fen`.
pub fn to_json(fen: &str, report: &PerftReport) -> serde_json::Result<String> {
    let json = ReportJson {
        fen,
        depth: report.depth,
        nodes: report.nodes,
        time_ms: report.elapsed.as_millis(),
        nodes_per_second: report.nodes_per_second(),
        divide: report
            .divide
            .iter()
            .map(|(mv, nodes)| DivideJson { mv, nodes: *nodes })
            .collect(),
    };
    serde_json::to_string_pretty(&json)
}

/// Coordinate text followed by the move's flags, e.g. "e1g1 castle".
pub fn describe(mv: Move) -> String {
    let mut line = mv.to_uci();
    let flags = [
        (mv.is_capture() && !mv.is_en_passant(), "capture"),
        (mv.is_en_passant(), "en-passant"),
        (mv.is_castle(), "castle"),
        (mv.is_double_push(), "double-push"),
        (mv.is_promotion(), "promotion"),
        (mv.gives_check(), "check"),
        (mv.is_threat(), "threat"),
    ];
    for (_, name) in flags.iter().filter(|(set, _)| *set) {
        line.push(' ');
        line.push_str(name);
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use chessbits_engine::{generate_moves, perft_divide, Position};
    use std::time::Duration;

    #[test]
    fn json_report_fields() {
        let mut position = Position::startpos();
        let report = perft_divide(&mut position, 1);
        let json = to_json(chessbits_core::Fen::STARTPOS, &report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["depth"], 1);
        assert_eq!(value["nodes"], 20);
        assert_eq!(value["divide"].as_array().unwrap().len(), 20);
        assert_eq!(value["divide"][0]["move"], "a2a3");
        assert_eq!(value["divide"][0]["nodes"], 1);
    }

    #[test]
    fn json_keeps_elapsed_time() {
        let report = PerftReport {
            depth: 0,
            divide: Vec::new(),
            nodes: 1,
            elapsed: Duration::from_millis(12),
        };
        let value: serde_json::Value =
            serde_json::from_str(&to_json("8/8/8/8/8/8/8/4K2k w - - 0 1", &report).unwrap())
                .unwrap();
        assert_eq!(value["time_ms"], 12);
        assert!(value["divide"].as_array().unwrap().is_empty());
    }

    #[test]
    fn describe_flags() {
        let position =
            Position::from_fen("r3k2r/8/8/3pP3/8/8/8/R3K2R w KQkq d6 0 1").unwrap();
        let lines: Vec<String> = generate_moves(&position).iter().map(|&m| describe(m)).collect();

        assert!(lines.contains(&"e5d6 en-passant".to_string()));
        assert!(lines.contains(&"e1g1 castle".to_string()));
        assert!(lines.contains(&"a1a8 capture check".to_string()));
        assert!(lines.contains(&"e5e6".to_string()));
    }
}
