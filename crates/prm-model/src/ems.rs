//! # Energy Management System Objects
//!
//! Sensors, actuators, programs, and calling managers injected by rules that
//! enforce controls at simulation time. Objects are keyed by name; adding an
//! object whose name already exists replaces it, so re-applying a rule never
//! duplicates EMS objects.

use serde::{Deserialize, Serialize};

use prm_core::ScheduleId;

/// An EMS sensor reading an output variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmsSensor {
    pub name: String,
    pub output_variable: String,
    pub key_name: String,
}

/// An EMS actuator overriding a schedule value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmsActuator {
    pub name: String,
    pub schedule: ScheduleId,
    /// Actuated component type, e.g. `Schedule:Constant`.
    pub component_type: String,
    /// Control type, e.g. `Schedule Value`.
    pub control_type: String,
}

/// An Erl program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmsProgram {
    pub name: String,
    pub lines: Vec<String>,
}

impl EmsProgram {
    /// Program body as Erl source, one statement per line.
    pub fn body(&self) -> String {
        self.lines.join("\n")
    }
}

/// Binds programs to a simulation calling point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmsProgramCallingManager {
    pub name: String,
    pub calling_point: String,
    pub programs: Vec<String>,
}

/// All EMS objects of a model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ems {
    #[serde(default)]
    pub sensors: Vec<EmsSensor>,
    #[serde(default)]
    pub actuators: Vec<EmsActuator>,
    #[serde(default)]
    pub programs: Vec<EmsProgram>,
    #[serde(default)]
    pub calling_managers: Vec<EmsProgramCallingManager>,
}

fn upsert<T>(items: &mut Vec<T>, item: T, name_of: impl Fn(&T) -> &str) {
    let name = name_of(&item).to_string();
    match items.iter_mut().find(|existing| name_of(&**existing) == name.as_str()) {
        Some(slot) => *slot = item,
        None => items.push(item),
    }
}

impl Ems {
    pub fn upsert_sensor(&mut self, sensor: EmsSensor) {
        upsert(&mut self.sensors, sensor, |s| &s.name);
    }

    pub fn upsert_actuator(&mut self, actuator: EmsActuator) {
        upsert(&mut self.actuators, actuator, |a| &a.name);
    }

    pub fn upsert_program(&mut self, program: EmsProgram) {
        upsert(&mut self.programs, program, |p| &p.name);
    }

    pub fn upsert_calling_manager(&mut self, manager: EmsProgramCallingManager) {
        upsert(&mut self.calling_managers, manager, |m| &m.name);
    }

    pub fn sensor(&self, name: &str) -> Option<&EmsSensor> {
        self.sensors.iter().find(|s| s.name == name)
    }

    pub fn actuator(&self, name: &str) -> Option<&EmsActuator> {
        self.actuators.iter().find(|a| a.name == name)
    }

    pub fn program(&self, name: &str) -> Option<&EmsProgram> {
        self.programs.iter().find(|p| p.name == name)
    }

    pub fn calling_manager(&self, name: &str) -> Option<&EmsProgramCallingManager> {
        self.calling_managers.iter().find(|m| m.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_replaces_by_name() {
        let mut ems = Ems::default();
        ems.upsert_program(EmsProgram {
            name: "P".into(),
            lines: vec!["SET A = 1".into()],
        });
        ems.upsert_program(EmsProgram {
            name: "P".into(),
            lines: vec!["SET A = 2".into()],
        });
        assert_eq!(ems.programs.len(), 1);
        assert_eq!(ems.program("P").unwrap().body(), "SET A = 2");
    }

    #[test]
    fn test_distinct_names_accumulate() {
        let mut ems = Ems::default();
        for name in ["a", "b"] {
            ems.upsert_sensor(EmsSensor {
                name: name.into(),
                output_variable: "v".into(),
                key_name: "k".into(),
            });
        }
        assert_eq!(ems.sensors.len(), 2);
        assert!(ems.sensor("b").is_some());
    }
}
