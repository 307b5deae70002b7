mod error;

pub use error::DirectoryError;

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveTime;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::info;
use ulid::Ulid;

use crate::limits::*;
use crate::model::*;

// ── Records ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Ulid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub bio: Option<String>,
}

impl User {
    pub fn actor(&self) -> Actor {
        Actor::new(self.id, self.role)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: Ulid,
    pub name: String,
    pub description: Option<String>,
    pub department_number: i64,
    pub manager_id: Ulid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDepartment {
    pub name: String,
    pub description: Option<String>,
    pub department_number: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: Ulid,
    pub name: String,
    pub created_by: Ulid,
    pub teacher_id: Ulid,
    pub department_id: Ulid,
    pub course_number: i64,
    pub group_number: i64,
    pub span: Span,
    pub first_day: Day,
    pub second_day: Day,
    pub participants: BTreeSet<Ulid>,
    /// Creation order; ulids only order to the millisecond.
    #[serde(skip)]
    seq: u64,
}

/// Course fields for both create and update. Days are raw text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseForm {
    pub name: String,
    pub teacher_id: Ulid,
    pub department_id: Ulid,
    pub course_number: i64,
    pub group_number: i64,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub first_day: String,
    pub second_day: String,
}

/// Which side of the staff line a user search covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    Teachers,
    Students,
}

// ── Field checks ─────────────────────────────────────────────────

fn check_name(field: &'static str, value: &str) -> Result<(), DirectoryError> {
    if value.trim().is_empty() {
        return Err(DirectoryError::Validation(format!("{field} must not be empty")));
    }
    if value.len() > MAX_NAME_LEN {
        return Err(DirectoryError::LimitExceeded("name too long"));
    }
    Ok(())
}

fn check_username(username: &str) -> Result<(), DirectoryError> {
    if username.is_empty() {
        return Err(DirectoryError::Validation("username must not be empty".into()));
    }
    if username.len() > MAX_USERNAME_LEN {
        return Err(DirectoryError::LimitExceeded("username too long"));
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        return Err(DirectoryError::Validation(format!(
            "username {username:?} may only contain letters, digits and @/./+/-/_"
        )));
    }
    Ok(())
}

/// Normalized (lowercased) address.
fn check_email(email: &str) -> Result<String, DirectoryError> {
    if email.len() > MAX_EMAIL_LEN {
        return Err(DirectoryError::LimitExceeded("email too long"));
    }
    let normalized = email.trim().to_lowercase();
    match normalized.split_once('@') {
        Some((local, domain))
            if !local.is_empty() && domain.contains('.') && !domain.contains('@') =>
        {
            Ok(normalized)
        }
        _ => Err(DirectoryError::Validation(format!("invalid email address {email:?}"))),
    }
}

fn check_bio(bio: &Option<String>) -> Result<(), DirectoryError> {
    if bio.as_ref().is_some_and(|b| b.len() > MAX_BIO_LEN) {
        return Err(DirectoryError::LimitExceeded("bio too long"));
    }
    Ok(())
}

fn parse_day(field: &str, raw: &str) -> Result<Day, DirectoryError> {
    raw.parse()
        .map_err(|e: ParseDayError| DirectoryError::Validation(format!("{field}: {e}")))
}

fn require_admin(actor: &Actor, what: &'static str) -> Result<(), DirectoryError> {
    if !actor.role.is_superuser() {
        return Err(DirectoryError::Forbidden(what));
    }
    Ok(())
}

// ── Directory ────────────────────────────────────────────────────

/// In-memory registry of users, departments and courses.
pub struct Directory {
    users: DashMap<Ulid, User>,
    /// username → user id
    usernames: DashMap<String, Ulid>,
    /// lowercased email → user id
    emails: DashMap<String, Ulid>,
    departments: DashMap<Ulid, Department>,
    department_numbers: DashMap<i64, Ulid>,
    courses: DashMap<Ulid, Course>,
    course_numbers: DashMap<i64, Ulid>,
    next_course_seq: AtomicU64,
}

impl Default for Directory {
    fn default() -> Self {
        Self::new()
    }
}

impl Directory {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            usernames: DashMap::new(),
            emails: DashMap::new(),
            departments: DashMap::new(),
            department_numbers: DashMap::new(),
            courses: DashMap::new(),
            course_numbers: DashMap::new(),
            next_course_seq: AtomicU64::new(0),
        }
    }

    // ── Users ────────────────────────────────────────────────

    pub fn register_user(&self, new: NewUser) -> Result<User, DirectoryError> {
        check_username(&new.username)?;
        check_name("first name", &new.first_name)?;
        check_name("last name", &new.last_name)?;
        let email = check_email(&new.email)?;

        let id = Ulid::new();
        match self.usernames.entry(new.username.clone()) {
            Entry::Occupied(_) => {
                return Err(DirectoryError::AlreadyExists(format!("username {}", new.username)));
            }
            Entry::Vacant(v) => {
                v.insert(id);
            }
        }
        match self.emails.entry(email.clone()) {
            Entry::Occupied(_) => {
                self.usernames.remove(&new.username);
                return Err(DirectoryError::AlreadyExists(format!("email {email}")));
            }
            Entry::Vacant(v) => {
                v.insert(id);
            }
        }

        let user = User {
            id,
            username: new.username,
            email,
            first_name: new.first_name,
            last_name: new.last_name,
            role: new.role,
            bio: None,
        };
        self.users.insert(id, user.clone());
        info!(%id, username = %user.username, role = ?user.role, "user registered");
        Ok(user)
    }

    pub fn get_user(&self, id: &Ulid) -> Option<User> {
        self.users.get(id).map(|u| u.value().clone())
    }

    pub fn find_by_username(&self, username: &str) -> Option<User> {
        let id = *self.usernames.get(username)?;
        self.get_user(&id)
    }

    /// Users may only edit their own profile.
    pub fn update_profile(
        &self,
        actor: Actor,
        user_id: Ulid,
        update: ProfileUpdate,
    ) -> Result<User, DirectoryError> {
        if actor.id != user_id {
            return Err(DirectoryError::Forbidden("you can only update your own profile"));
        }
        check_name("first name", &update.first_name)?;
        check_name("last name", &update.last_name)?;
        check_bio(&update.bio)?;
        let email = check_email(&update.email)?;

        let mut user = self.users.get_mut(&user_id).ok_or(DirectoryError::NotFound(user_id))?;
        if email != user.email {
            match self.emails.entry(email.clone()) {
                Entry::Occupied(_) => {
                    return Err(DirectoryError::AlreadyExists(format!("email {email}")));
                }
                Entry::Vacant(v) => {
                    v.insert(user_id);
                }
            }
            self.emails.remove(&user.email);
            user.email = email;
        }
        user.first_name = update.first_name;
        user.last_name = update.last_name;
        user.bio = update.bio;
        Ok(user.clone())
    }

    /// Case-insensitive substring search over first name, last name and
    /// username. An empty query lists everyone. Sorted by username.
    pub fn search(&self, audience: Audience, q: &str) -> Vec<User> {
        let needle = q.trim().to_lowercase();
        let mut hits: Vec<User> = self
            .users
            .iter()
            .filter(|u| match audience {
                Audience::Teachers => u.role.is_staff(),
                Audience::Students => !u.role.is_staff(),
            })
            .filter(|u| {
                needle.is_empty()
                    || u.first_name.to_lowercase().contains(&needle)
                    || u.last_name.to_lowercase().contains(&needle)
                    || u.username.to_lowercase().contains(&needle)
            })
            .map(|u| u.value().clone())
            .collect();
        hits.sort_by(|a, b| a.username.cmp(&b.username));
        hits
    }

    // ── Departments ──────────────────────────────────────────

    pub fn create_department(&self, actor: Actor, new: NewDepartment) -> Result<Department, DirectoryError> {
        require_admin(&actor, "only admins can create departments")?;
        check_name("department name", &new.name)?;
        if new
            .description
            .as_ref()
            .is_some_and(|d| d.len() > MAX_DESCRIPTION_LEN)
        {
            return Err(DirectoryError::LimitExceeded("description too long"));
        }

        let id = Ulid::new();
        match self.department_numbers.entry(new.department_number) {
            Entry::Occupied(_) => {
                return Err(DirectoryError::AlreadyExists(format!(
                    "department number {}",
                    new.department_number
                )));
            }
            Entry::Vacant(v) => {
                v.insert(id);
            }
        }
        let department = Department {
            id,
            name: new.name,
            description: new.description,
            department_number: new.department_number,
            manager_id: actor.id,
        };
        self.departments.insert(id, department.clone());
        info!(%id, number = department.department_number, "department created");
        Ok(department)
    }

    pub fn get_department(&self, id: &Ulid) -> Option<Department> {
        self.departments.get(id).map(|d| d.value().clone())
    }

    pub fn find_department(&self, department_number: i64) -> Result<Department, DirectoryError> {
        self.department_numbers
            .get(&department_number)
            .and_then(|id| self.get_department(&id))
            .ok_or(DirectoryError::UnknownDepartment(department_number))
    }

    /// All departments ordered by number.
    pub fn list_departments(&self) -> Vec<Department> {
        let mut all: Vec<Department> = self.departments.iter().map(|d| d.value().clone()).collect();
        all.sort_by_key(|d| d.department_number);
        all
    }

    // ── Courses ──────────────────────────────────────────────

    /// Shared checks for create/update; returns (span, first_day, second_day).
    fn check_course_form(&self, form: &CourseForm) -> Result<(Span, Day, Day), DirectoryError> {
        check_name("course name", &form.name)?;
        let teacher = self
            .get_user(&form.teacher_id)
            .ok_or(DirectoryError::NotFound(form.teacher_id))?;
        if !teacher.role.is_staff() {
            return Err(DirectoryError::Validation(format!(
                "{} is not a teacher",
                teacher.username
            )));
        }
        if !self.departments.contains_key(&form.department_id) {
            return Err(DirectoryError::NotFound(form.department_id));
        }
        if form.start >= form.end {
            return Err(DirectoryError::Validation(
                "course start time must be before end time".into(),
            ));
        }
        let first_day = parse_day("first day", &form.first_day)?;
        let second_day = parse_day("second day", &form.second_day)?;
        Ok((Span::new(form.start, form.end), first_day, second_day))
    }

    pub fn create_course(&self, actor: Actor, form: CourseForm) -> Result<Course, DirectoryError> {
        require_admin(&actor, "only admins can create courses")?;
        let (span, first_day, second_day) = self.check_course_form(&form)?;

        let id = Ulid::new();
        match self.course_numbers.entry(form.course_number) {
            Entry::Occupied(_) => {
                return Err(DirectoryError::AlreadyExists(format!(
                    "course number {}",
                    form.course_number
                )));
            }
            Entry::Vacant(v) => {
                v.insert(id);
            }
        }
        let course = Course {
            id,
            name: form.name,
            created_by: actor.id,
            teacher_id: form.teacher_id,
            department_id: form.department_id,
            course_number: form.course_number,
            group_number: form.group_number,
            span,
            first_day,
            second_day,
            participants: BTreeSet::new(),
            seq: self.next_course_seq.fetch_add(1, Ordering::Relaxed),
        };
        self.courses.insert(id, course.clone());
        info!(%id, number = course.course_number, "course created");
        Ok(course)
    }

    /// Only the user who created a course may change it.
    pub fn update_course(&self, actor: Actor, id: Ulid, form: CourseForm) -> Result<Course, DirectoryError> {
        let created_by = self
            .courses
            .get(&id)
            .map(|c| c.created_by)
            .ok_or(DirectoryError::NotFound(id))?;
        if created_by != actor.id {
            return Err(DirectoryError::Forbidden("you can only update your own course"));
        }
        let (span, first_day, second_day) = self.check_course_form(&form)?;
        let mut course = self.courses.get_mut(&id).ok_or(DirectoryError::NotFound(id))?;

        if form.course_number != course.course_number {
            match self.course_numbers.entry(form.course_number) {
                Entry::Occupied(_) => {
                    return Err(DirectoryError::AlreadyExists(format!(
                        "course number {}",
                        form.course_number
                    )));
                }
                Entry::Vacant(v) => {
                    v.insert(id);
                }
            }
            self.course_numbers.remove(&course.course_number);
        }

        course.name = form.name;
        course.teacher_id = form.teacher_id;
        course.department_id = form.department_id;
        course.course_number = form.course_number;
        course.group_number = form.group_number;
        course.span = span;
        course.first_day = first_day;
        course.second_day = second_day;
        Ok(course.clone())
    }

    pub fn get_course(&self, id: &Ulid) -> Option<Course> {
        self.courses.get(id).map(|c| c.value().clone())
    }

    pub fn find_course(&self, course_number: i64) -> Option<Course> {
        let id = *self.course_numbers.get(&course_number)?;
        self.get_course(&id)
    }

    /// The first `limit` courses in creation order.
    pub fn courses(&self, limit: usize) -> Vec<Course> {
        let mut all: Vec<Course> = self.courses.iter().map(|c| c.value().clone()).collect();
        all.sort_by_key(|c| c.seq);
        all.truncate(limit);
        all
    }

    pub fn enroll(&self, actor: Actor, course_id: Ulid) -> Result<(), DirectoryError> {
        if actor.role.is_staff() {
            return Err(DirectoryError::Forbidden("staff cannot enroll in courses"));
        }
        let mut course = self
            .courses
            .get_mut(&course_id)
            .ok_or(DirectoryError::NotFound(course_id))?;
        if !course.participants.insert(actor.id) {
            return Err(DirectoryError::AlreadyExists(format!("enrollment in {course_id}")));
        }
        Ok(())
    }

    pub fn drop_course(&self, actor: Actor, course_id: Ulid) -> Result<(), DirectoryError> {
        let mut course = self
            .courses
            .get_mut(&course_id)
            .ok_or(DirectoryError::NotFound(course_id))?;
        if !course.participants.remove(&actor.id) {
            return Err(DirectoryError::NotEnrolled(course_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::t;

    fn new_user(username: &str, role: Role) -> NewUser {
        NewUser {
            username: username.into(),
            email: format!("{username}@uni.example"),
            first_name: "Ada".into(),
            last_name: username.to_uppercase(),
            role,
        }
    }

    fn seeded() -> (Directory, User, User, Department) {
        let dir = Directory::new();
        let admin = dir.register_user(new_user("root", Role::Admin)).unwrap();
        let teacher = dir.register_user(new_user("turing", Role::Teacher)).unwrap();
        let dept = dir
            .create_department(
                admin.actor(),
                NewDepartment {
                    name: "Computer Science".into(),
                    description: None,
                    department_number: 10,
                },
            )
            .unwrap();
        (dir, admin, teacher, dept)
    }

    fn form(teacher: &User, dept: &Department, number: i64) -> CourseForm {
        CourseForm {
            name: "Compilers".into(),
            teacher_id: teacher.id,
            department_id: dept.id,
            course_number: number,
            group_number: 1,
            start: t(10, 0),
            end: t(12, 0),
            first_day: "Saturday".into(),
            second_day: "monday".into(),
        }
    }

    #[test]
    fn duplicate_username_and_email_rejected() {
        let dir = Directory::new();
        dir.register_user(new_user("alice", Role::Student)).unwrap();

        let err = dir.register_user(new_user("alice", Role::Student)).unwrap_err();
        assert!(matches!(err, DirectoryError::AlreadyExists(_)));

        let mut other = new_user("alice2", Role::Student);
        other.email = "ALICE@uni.example".into();
        let err = dir.register_user(other).unwrap_err();
        assert!(matches!(err, DirectoryError::AlreadyExists(_)));
        // Failed registration does not squat the username.
        assert!(dir.find_by_username("alice2").is_none());
        dir.register_user(new_user("alice2", Role::Student)).unwrap();
    }

    #[test]
    fn bad_user_fields_rejected() {
        let dir = Directory::new();
        let mut u = new_user("bob", Role::Student);
        u.email = "not-an-email".into();
        assert!(matches!(dir.register_user(u), Err(DirectoryError::Validation(_))));

        let u = new_user("bob smith", Role::Student);
        assert!(matches!(dir.register_user(u), Err(DirectoryError::Validation(_))));
    }

    #[test]
    fn profile_update_own_only() {
        let dir = Directory::new();
        let a = dir.register_user(new_user("amy", Role::Student)).unwrap();
        let b = dir.register_user(new_user("ben", Role::Student)).unwrap();
        let update = ProfileUpdate {
            first_name: "Amy".into(),
            last_name: "Noether".into(),
            email: "amy@math.example".into(),
            bio: Some("*rings*".into()),
        };

        assert!(matches!(
            dir.update_profile(b.actor(), a.id, update.clone()),
            Err(DirectoryError::Forbidden(_))
        ));
        let updated = dir.update_profile(a.actor(), a.id, update).unwrap();
        assert_eq!(updated.email, "amy@math.example");
        assert_eq!(updated.bio.as_deref(), Some("*rings*"));

        // Old address is free again, new one is taken.
        let mut c = new_user("cat", Role::Student);
        c.email = "amy@uni.example".into();
        dir.register_user(c).unwrap();
        let mut d = new_user("dan", Role::Student);
        d.email = "amy@math.example".into();
        assert!(dir.register_user(d).is_err());
    }

    #[test]
    fn search_splits_staff_and_students() {
        let dir = Directory::new();
        dir.register_user(new_user("hopper", Role::Teacher)).unwrap();
        dir.register_user(new_user("knuth", Role::Admin)).unwrap();
        dir.register_user(new_user("hopkins", Role::Student)).unwrap();

        let teachers: Vec<_> = dir.search(Audience::Teachers, "").into_iter().map(|u| u.username).collect();
        assert_eq!(teachers, vec!["hopper", "knuth"]);

        let students: Vec<_> = dir.search(Audience::Students, "HOP").into_iter().map(|u| u.username).collect();
        assert_eq!(students, vec!["hopkins"]);

        assert!(dir.search(Audience::Teachers, "zzz").is_empty());
    }

    #[test]
    fn departments_admin_only_and_unique() {
        let (dir, admin, teacher, _) = seeded();
        let new = NewDepartment {
            name: "Maths".into(),
            description: Some("numbers".into()),
            department_number: 20,
        };
        assert!(matches!(
            dir.create_department(teacher.actor(), new.clone()),
            Err(DirectoryError::Forbidden(_))
        ));
        dir.create_department(admin.actor(), new.clone()).unwrap();
        assert!(matches!(
            dir.create_department(admin.actor(), new),
            Err(DirectoryError::AlreadyExists(_))
        ));
        let numbers: Vec<_> = dir.list_departments().iter().map(|d| d.department_number).collect();
        assert_eq!(numbers, vec![10, 20]);
    }

    #[test]
    fn course_create_validates_days_and_teacher() {
        let (dir, admin, teacher, dept) = seeded();

        assert!(matches!(
            dir.create_course(admin.actor(), form(&teacher, &dept, 100)),
            Err(DirectoryError::Validation(_))
        ));

        let mut f = form(&teacher, &dept, 100);
        f.first_day = "Wednesday".into();
        f.teacher_id = admin.id; // admins are staff, allowed
        let course = dir.create_course(admin.actor(), f.clone()).unwrap();
        assert_eq!(course.first_day, Day::Wednesday);
        assert_eq!(dir.find_course(100).unwrap().id, course.id);

        assert!(matches!(
            dir.create_course(admin.actor(), f.clone()),
            Err(DirectoryError::AlreadyExists(_))
        ));

        let student = dir.register_user(new_user("sam", Role::Student)).unwrap();
        f.course_number = 101;
        f.teacher_id = student.id;
        assert!(matches!(
            dir.create_course(admin.actor(), f),
            Err(DirectoryError::Validation(_))
        ));
        assert!(matches!(
            dir.create_course(teacher.actor(), form(&teacher, &dept, 102)),
            Err(DirectoryError::Forbidden(_))
        ));
    }

    #[test]
    fn course_update_by_creator_renumbers() {
        let (dir, admin, teacher, dept) = seeded();
        let other_admin = dir.register_user(new_user("sudo", Role::Admin)).unwrap();
        let mut f = form(&teacher, &dept, 100);
        f.first_day = "tuesday".into();
        let course = dir.create_course(admin.actor(), f.clone()).unwrap();
        let mut other = f.clone();
        other.course_number = 200;
        dir.create_course(admin.actor(), other).unwrap();

        f.course_number = 300;
        assert!(matches!(
            dir.update_course(other_admin.actor(), course.id, f.clone()),
            Err(DirectoryError::Forbidden(_))
        ));
        let updated = dir.update_course(admin.actor(), course.id, f.clone()).unwrap();
        assert_eq!(updated.course_number, 300);
        assert!(dir.find_course(100).is_none());
        assert_eq!(dir.find_course(300).unwrap().id, course.id);

        f.course_number = 200;
        assert!(matches!(
            dir.update_course(admin.actor(), course.id, f),
            Err(DirectoryError::AlreadyExists(_))
        ));
    }

    #[test]
    fn enrollment_round() {
        let (dir, admin, teacher, dept) = seeded();
        let mut f = form(&teacher, &dept, 100);
        f.first_day = "friday".into();
        let course = dir.create_course(admin.actor(), f).unwrap();
        let s = dir.register_user(new_user("sue", Role::Student)).unwrap();

        dir.enroll(s.actor(), course.id).unwrap();
        assert!(dir.enroll(s.actor(), course.id).is_err());
        assert!(matches!(
            dir.enroll(teacher.actor(), course.id),
            Err(DirectoryError::Forbidden(_))
        ));
        assert!(dir.get_course(&course.id).unwrap().participants.contains(&s.id));

        dir.drop_course(s.actor(), course.id).unwrap();
        assert_eq!(dir.drop_course(s.actor(), course.id), Err(DirectoryError::NotEnrolled(course.id)));
        assert_eq!(dir.courses(5).len(), 1);
    }

    #[test]
    fn courses_list_in_creation_order() {
        let (dir, admin, teacher, dept) = seeded();
        for n in 0..50 {
            let mut f = form(&teacher, &dept, n);
            f.first_day = "thursday".into();
            dir.create_course(admin.actor(), f).unwrap();
        }
        let numbers: Vec<_> = dir.courses(5).iter().map(|c| c.course_number).collect();
        assert_eq!(numbers, vec![0, 1, 2, 3, 4]);
        assert_eq!(dir.courses(100).len(), 50);
    }

    #[test]
    fn course_update_checks_creator_before_form() {
        let (dir, admin, teacher, dept) = seeded();
        let other_admin = dir.register_user(new_user("sudo", Role::Admin)).unwrap();
        let mut f = form(&teacher, &dept, 100);
        f.first_day = "monday".into();
        let course = dir.create_course(admin.actor(), f.clone()).unwrap();

        let mut bad = f;
        bad.first_day = "Sunday".into();
        bad.department_id = Ulid::new();
        assert!(matches!(
            dir.update_course(other_admin.actor(), course.id, bad.clone()),
            Err(DirectoryError::Forbidden(_))
        ));
        assert!(matches!(
            dir.update_course(admin.actor(), course.id, bad),
            Err(DirectoryError::NotFound(_))
        ));
        assert!(matches!(
            dir.update_course(admin.actor(), Ulid::new(), form(&teacher, &dept, 1)),
            Err(DirectoryError::NotFound(_))
        ));
    }

    #[test]
    fn department_by_number() {
        let (dir, _, _, dept) = seeded();
        assert_eq!(dir.find_department(10).unwrap().id, dept.id);
        assert_eq!(dir.find_department(11), Err(DirectoryError::UnknownDepartment(11)));
    }
}
