//! JSON shapes printed by the binary.

use std::collections::BTreeMap;

use breakout_core::{Algorithm, Error, ErrorKind, PairStats};
use breakout_engine::Schedule;
use serde::Serialize;

/// Successful run. `assignments[k]` maps room number to participant ids for
/// round `k + 1`.
#[derive(Debug, Serialize)]
pub struct ScheduleReport<'a> {
    pub assignments: Vec<BTreeMap<usize, Vec<u32>>>,
    pub algorithms: Vec<Algorithm>,
    pub stats: &'a PairStats,
}

impl<'a> From<&'a Schedule> for ScheduleReport<'a> {
    fn from(schedule: &'a Schedule) -> Self {
        Self {
            assignments: schedule.assignments().map(|a| a.to_room_map()).collect(),
            algorithms: schedule.rounds.iter().map(|r| r.algorithm).collect(),
            stats: &schedule.stats,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub status: u16,
    pub message: String,
}

impl From<&Error> for ErrorReport {
    fn from(e: &Error) -> Self {
        let kind = e.kind();
        Self {
            kind,
            status: kind.status(),
            message: e.to_string(),
        }
    }
}

impl ErrorReport {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"kind":"solver","status":502,"message":{:?}}}"#, self.message)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use breakout_engine::{Engine, EngineConfig, Request};

    #[test]
    fn schedule_report_shape() {
        let schedule = Engine::new(EngineConfig::default().with_seed(1))
            .run(&Request::new(5, 2, 2, Algorithm::Greedy))
            .unwrap();
        let value = serde_json::to_value(ScheduleReport::from(&schedule)).unwrap();

        let rounds = value["assignments"].as_array().unwrap();
        assert_eq!(rounds.len(), 2);
        for round in rounds {
            let rooms = round.as_object().unwrap();
            assert_eq!(rooms.keys().collect::<Vec<_>>(), vec!["1", "2"]);
            let seated: usize = rooms.values().map(|v| v.as_array().unwrap().len()).sum();
            assert_eq!(seated, 5);
        }
        assert_eq!(value["algorithms"], serde_json::json!(["random", "greedy"]));
        assert!(value["stats"]["distribution"].is_object());
    }

    #[test]
    fn error_report_carries_status() {
        let err = Error::InvalidConfiguration("rooms exceed participants".into());
        let value: serde_json::Value = serde_json::from_str(&ErrorReport::from(&err).to_json()).unwrap();
        assert_eq!(value["kind"], "invalidConfiguration");
        assert_eq!(value["status"], 400);
        assert!(value["message"].as_str().unwrap().contains("rooms exceed participants"));
    }
}
