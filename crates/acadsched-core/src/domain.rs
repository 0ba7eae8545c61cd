//! Scheduling domain records.
//!
//! These are the payloads handed to and returned from the monitored services.
//! Field names serialize in camelCase to match what the admin frontend sends.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A faculty member and their teaching limits.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faculty {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub designation: String,
    #[serde(default)]
    pub employee_id: String,
    #[serde(default)]
    pub max_hours_per_day: u32,
    #[serde(default)]
    pub max_hours_per_week: u32,
    #[serde(default)]
    pub specialization: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub qualifications: Vec<String>,
    #[serde(default)]
    pub eligible_subjects: Vec<String>,
}

/// Kind of teaching space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RoomType {
    Lecture,
    Lab,
    Seminar,
}

/// Publication state of a room record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RoomStatus {
    Draft,
    #[default]
    Published,
}

/// A room that sections can be scheduled into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub building: String,
    #[serde(default)]
    pub floor: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub room_type: Option<RoomType>,
    #[serde(default)]
    pub capacity: u32,
    #[serde(default)]
    pub status: RoomStatus,
    #[serde(default)]
    pub equipment: Vec<String>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub wheelchair_accessible: bool,
}

impl Default for Room {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            code: String::new(),
            building: String::new(),
            floor: String::new(),
            room_type: None,
            capacity: 0,
            status: RoomStatus::default(),
            equipment: Vec::new(),
            active: true,
            wheelchair_accessible: false,
        }
    }
}

/// Publication state of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SectionStatus {
    Active,
    Draft,
}

/// A student section (cohort) within a department and year.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub year: u32,
    #[serde(default)]
    pub capacity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SectionStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mentor_id: Option<i64>,
}

/// A course offering and its weekly load.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub credits: u32,
    #[serde(default)]
    pub lecture_hours_per_week: u32,
    #[serde(default)]
    pub tutorial_hours_per_week: u32,
    #[serde(default)]
    pub lab_hours_per_week: u32,
    #[serde(default)]
    pub year: u32,
    #[serde(default)]
    pub elective: bool,
    #[serde(default)]
    pub common_course: bool,
    #[serde(default)]
    pub faculty_count: u32,
    /// `None` on update keeps the stored list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eligible_faculty: Option<Vec<String>>,
}

/// Decision state of a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Approved => write!(f, "Approved"),
            Self::Rejected => write!(f, "Rejected"),
        }
    }
}

/// A faculty member's request for leave.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub faculty_id: i64,
    #[serde(default)]
    pub faculty_name: String,
    #[serde(default)]
    pub leave_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub reason: String,
    /// Filled with [`LeaveStatus::Pending`] on creation when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<LeaveStatus>,
    /// Filled with the current date on creation when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied_date: Option<NaiveDate>,
}

/// A scheduling rule the timetable must respect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub name: String,
    #[serde(rename = "type", default)]
    pub constraint_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    /// Free-form rule parameters, usually a JSON document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<String>,
}

impl Default for Constraint {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            constraint_type: String::new(),
            description: String::new(),
            active: true,
            priority: None,
            parameters: None,
        }
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_defaults_from_json() {
        let room: Room = serde_json::from_str(r#"{"name":"Hall A","code":"HA-1"}"#).unwrap();
        assert!(room.active);
        assert_eq!(room.status, RoomStatus::Published);
        assert!(room.room_type.is_none());
    }

    #[test]
    fn test_room_type_uses_wire_name() {
        let room = Room {
            name: "Lab 2".to_string(),
            code: "L2".to_string(),
            room_type: Some(RoomType::Lab),
            ..Default::default()
        };
        let json = serde_json::to_value(&room).unwrap();
        assert_eq!(json["type"], "LAB");
        assert_eq!(json["wheelchairAccessible"], false);
    }

    #[test]
    fn test_leave_status_serialization() {
        assert_eq!(
            serde_json::to_string(&LeaveStatus::Approved).unwrap(),
            "\"Approved\""
        );
        assert_eq!(LeaveStatus::Rejected.to_string(), "Rejected");
    }

    #[test]
    fn test_constraint_type_field() {
        let c: Constraint =
            serde_json::from_str(r#"{"name":"No Friday labs","type":"institutional"}"#).unwrap();
        assert_eq!(c.constraint_type, "institutional");
        assert!(c.active);
        assert!(c.id.is_none());
    }
}
