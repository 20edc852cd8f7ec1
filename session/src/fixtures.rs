//! 演示数据 Fixture
//!
//! 静态模板，生成一次后不再变化；会话内的修改只作用于
//! 调用方拿到的克隆，绝不写回模板。

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use classdesk_shared::{
    Announcement, DEMO_EMAIL, Fee, FeeStatus, Priority, SchoolClass, Section, Student, Subject,
    Teacher, User,
};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("static fixture date")
}

fn timestamp(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
        .single()
        .expect("static fixture timestamp")
}

/// 固定的演示管理员账户，带全量权限列表
pub fn demo_user() -> User {
    User {
        id: "demo-user-001".into(),
        email: DEMO_EMAIL.into(),
        first_name: "Demo".into(),
        last_name: "Administrator".into(),
        full_name: "Demo Administrator".into(),
        role: "admin".into(),
        roles: vec!["admin".into(), "teacher".into(), "student".into()],
        profile_picture: Some(
            "https://images.unsplash.com/photo-1472099645785-5658abf4ff4e?w=150&h=150&fit=crop&crop=face"
                .into(),
        ),
        phone: Some("+1 (555) 123-4567".into()),
        address: Some("123 Demo Street, Demo City, DC 12345".into()),
        date_of_birth: Some(date(1990, 1, 1)),
        gender: Some("Not specified".into()),
        created_at: Some(timestamp(2024, 1, 1, 0, 0, 0)),
        updated_at: Some(timestamp(2024, 1, 1, 0, 0, 0)),
        status: "active".into(),
        permissions: [
            "school:read",
            "school:write",
            "school:delete",
            "academic:read",
            "academic:write",
            "academic:delete",
            "finance:read",
            "finance:write",
            "finance:delete",
            "communication:read",
            "communication:write",
            "communication:delete",
            "user:read",
            "user:write",
            "user:delete",
        ]
        .into_iter()
        .map(String::from)
        .collect(),
    }
}

/// 一套完整的学校实体演示数据
#[derive(Debug, Clone)]
pub struct FixtureBundle {
    pub user: User,
    pub classes: Vec<SchoolClass>,
    pub sections: Vec<Section>,
    pub subjects: Vec<Subject>,
    pub students: Vec<Student>,
    pub teachers: Vec<Teacher>,
    pub fees: Vec<Fee>,
    pub announcements: Vec<Announcement>,
}

impl FixtureBundle {
    pub fn generate() -> Self {
        FixtureBundle {
            user: demo_user(),
            classes: vec![
                SchoolClass {
                    id: "class-001".into(),
                    name: "Grade 10A".into(),
                    grade: "10".into(),
                    section: "A".into(),
                    capacity: 30,
                    current_enrollment: 28,
                    teacher: "John Smith".into(),
                    subjects: vec!["Mathematics".into(), "Science".into(), "English".into()],
                    schedule: "Monday-Friday, 8:00 AM - 3:00 PM".into(),
                    room: "Room 101".into(),
                    status: "active".into(),
                },
                SchoolClass {
                    id: "class-002".into(),
                    name: "Grade 9B".into(),
                    grade: "9".into(),
                    section: "B".into(),
                    capacity: 25,
                    current_enrollment: 22,
                    teacher: "Sarah Johnson".into(),
                    subjects: vec!["History".into(), "Geography".into(), "Literature".into()],
                    schedule: "Monday-Friday, 8:00 AM - 3:00 PM".into(),
                    room: "Room 102".into(),
                    status: "active".into(),
                },
            ],
            sections: vec![
                Section {
                    id: "sec-001".into(),
                    name: "A".into(),
                    grade: "10".into(),
                    capacity: 30,
                    current_enrollment: 28,
                },
                Section {
                    id: "sec-002".into(),
                    name: "B".into(),
                    grade: "9".into(),
                    capacity: 25,
                    current_enrollment: 22,
                },
                Section {
                    id: "sec-003".into(),
                    name: "C".into(),
                    grade: "11".into(),
                    capacity: 28,
                    current_enrollment: 25,
                },
            ],
            subjects: vec![
                Subject {
                    id: "sub-001".into(),
                    name: "Mathematics".into(),
                    code: "MATH101".into(),
                    grade: "10".into(),
                    teacher: "John Smith".into(),
                },
                Subject {
                    id: "sub-002".into(),
                    name: "Science".into(),
                    code: "SCI101".into(),
                    grade: "10".into(),
                    teacher: "John Smith".into(),
                },
                Subject {
                    id: "sub-003".into(),
                    name: "English".into(),
                    code: "ENG101".into(),
                    grade: "10".into(),
                    teacher: "Sarah Johnson".into(),
                },
            ],
            students: vec![
                Student {
                    id: "student-001".into(),
                    first_name: "Alice".into(),
                    last_name: "Johnson".into(),
                    full_name: "Alice Johnson".into(),
                    email: "alice.johnson@school.com".into(),
                    grade: "10".into(),
                    section: "A".into(),
                    roll_number: "1001".into(),
                    status: "active".into(),
                },
                Student {
                    id: "student-002".into(),
                    first_name: "Bob".into(),
                    last_name: "Smith".into(),
                    full_name: "Bob Smith".into(),
                    email: "bob.smith@school.com".into(),
                    grade: "9".into(),
                    section: "B".into(),
                    roll_number: "2001".into(),
                    status: "active".into(),
                },
            ],
            teachers: vec![
                Teacher {
                    id: "teacher-001".into(),
                    first_name: "John".into(),
                    last_name: "Smith".into(),
                    full_name: "John Smith".into(),
                    email: "john.smith@school.com".into(),
                    subjects: vec!["Mathematics".into(), "Science".into()],
                    qualification: "M.Sc. Mathematics".into(),
                    experience: "8 years".into(),
                    status: "active".into(),
                },
                Teacher {
                    id: "teacher-002".into(),
                    first_name: "Sarah".into(),
                    last_name: "Johnson".into(),
                    full_name: "Sarah Johnson".into(),
                    email: "sarah.johnson@school.com".into(),
                    subjects: vec!["English".into(), "Literature".into()],
                    qualification: "M.A. English".into(),
                    experience: "5 years".into(),
                    status: "active".into(),
                },
            ],
            fees: vec![
                Fee {
                    id: "fee-001".into(),
                    student_id: "student-001".into(),
                    student_name: "Alice Johnson".into(),
                    fee_type: "Tuition Fee".into(),
                    amount: 500.0,
                    due_date: date(2024, 2, 1),
                    status: FeeStatus::Paid,
                    paid_date: Some(date(2024, 1, 15)),
                },
                Fee {
                    id: "fee-002".into(),
                    student_id: "student-002".into(),
                    student_name: "Bob Smith".into(),
                    fee_type: "Tuition Fee".into(),
                    amount: 500.0,
                    due_date: date(2024, 2, 1),
                    status: FeeStatus::Pending,
                    paid_date: None,
                },
            ],
            announcements: vec![
                Announcement {
                    id: "announcement-001".into(),
                    title: "Parent-Teacher Meeting".into(),
                    content: "Parent-Teacher meeting scheduled for next Friday at 3:00 PM.".into(),
                    author: "Principal".into(),
                    priority: Priority::High,
                    created_at: timestamp(2024, 1, 15, 10, 0, 0),
                    expires_at: timestamp(2024, 2, 15, 23, 59, 59),
                },
                Announcement {
                    id: "announcement-002".into(),
                    title: "Sports Day".into(),
                    content: "Annual sports day will be held on March 15th. All students are \
                              encouraged to participate."
                        .into(),
                    author: "Sports Department".into(),
                    priority: Priority::Medium,
                    created_at: timestamp(2024, 1, 10, 14, 0, 0),
                    expires_at: timestamp(2024, 3, 20, 23, 59, 59),
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_user_is_admin_with_full_permissions() {
        let user = demo_user();
        assert_eq!(user.role, "admin");
        assert!(user.has_any_role(&["admin"]));
        assert_eq!(user.permissions.len(), 15);
    }

    #[test]
    fn bundle_entities_are_linked() {
        let bundle = FixtureBundle::generate();
        // Every fee references a known student.
        for fee in &bundle.fees {
            assert!(bundle.students.iter().any(|s| s.id == fee.student_id));
        }
        assert_eq!(bundle.classes.len(), 2);
        assert_eq!(bundle.sections.len(), 3);
    }
}
