mod api;
mod args;
mod class;
mod course;
mod grades;
mod mock;
mod role;
mod routes;
mod session;
mod token;
mod user;
mod views;

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::Parser;
use log::{debug, info};

use api::ApiClient;
use args::{Args, Command};
use course::{CourseRecord, StudentRecord};
use grades::{format_score, GradeField, GradeSet};
use routes::{Resolution, Route};
use session::SessionStore;
use views::{
    timetable, CourseDetail, GradeEditor, LecturerDashboard, LoginForm, RegisterError,
    RegisterForm, Screen, StudentDashboard, ViewModel,
};

#[tokio::main]
async fn main() -> ExitCode {
    pretty_env_logger::init();

    let args = Args::parse();
    let api = ApiClient::new(args.base_url());
    let mut session = SessionStore::load(args.session_file());

    run(args.command, &api, &mut session).await
}

async fn run(command: Command, api: &ApiClient, session: &mut SessionStore) -> ExitCode {
    match command {
        Command::Login {
            username_or_email,
            password,
        } => login(api, session, username_or_email, password).await,

        Command::Register {
            email,
            username,
            full_name,
            password,
            password_confirmation,
            major,
        } => {
            let form = RegisterForm {
                email,
                username,
                full_name,
                password,
                password_confirmation,
                major,
            };
            register(api, &form).await
        }

        Command::Open { path } => {
            let route = path.parse().unwrap_or(Route::Landing);
            navigate(route, api, session).await
        }

        Command::Dashboard => navigate(Route::Landing, api, session).await,

        Command::Course { course_id } => {
            navigate(Route::Course(course_id), api, session).await
        }

        Command::Grades {
            course_id,
            student_id,
            classwork,
            midterm,
            finals,
        } => {
            let inputs = [
                (GradeField::Classwork, classwork),
                (GradeField::Midterm, midterm),
                (GradeField::Finals, finals),
            ];
            enter_grades(api, session, &course_id, &student_id, inputs).await
        }

        Command::Logout => navigate(Route::Logout, api, session).await,
    }
}

/// Walk the guard until something renders. Protected routes bounce
/// anonymous visitors to login; everyone else ends up somewhere their
/// role may see.
async fn navigate(mut route: Route, api: &ApiClient, session: &mut SessionStore) -> ExitCode {
    loop {
        match routes::resolve(&route, session.user()) {
            Resolution::Render(route) => return render(route, api, session).await,

            Resolution::Redirect(next) => {
                debug!("{route} -> {next}");
                route = next;
            }

            Resolution::RedirectToLogin { from } => {
                info!("unauthenticated visit to {from}");
                println!("Not logged in (requested {from}).");
                println!("Use `uniportal login <username-or-email>` to continue.");
                return ExitCode::FAILURE;
            }
        }
    }
}

async fn render(route: Route, api: &ApiClient, session: &mut SessionStore) -> ExitCode {
    match route {
        // the guard always redirects the landing route
        Route::Landing => ExitCode::SUCCESS,

        Route::Login => {
            println!("Use `uniportal login <username-or-email>` to sign in.");
            ExitCode::SUCCESS
        }

        Route::Register => {
            println!("Use `uniportal register --help` to create an account.");
            ExitCode::SUCCESS
        }

        Route::Logout => {
            session.clear_auth();
            println!("Signed out.");
            ExitCode::SUCCESS
        }

        Route::StudentDashboard => student_dashboard(api, session).await,
        Route::LecturerDashboard => lecturer_dashboard(api, session).await,
        Route::Course(id) => course_detail(api, session, &id).await,
    }
}

async fn login(
    api: &ApiClient,
    session: &mut SessionStore,
    username_or_email: String,
    password: Option<String>,
) -> ExitCode {
    let password = match password {
        Some(password) => password,
        None => match prompt_password() {
            Ok(password) => password,
            Err(e) => {
                eprintln!("couldn't read password: {e}");
                return ExitCode::FAILURE;
            }
        },
    };

    let form = LoginForm {
        username_or_email,
        password,
    };

    match views::login::submit(api, session, &form).await {
        Ok(outcome) => {
            println!("Logged in as {}.", outcome.role);
            navigate(outcome.redirect, api, session).await
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn register(api: &ApiClient, form: &RegisterForm) -> ExitCode {
    match views::register::submit(api, form).await {
        Ok(outcome) => {
            println!("{}", outcome.status);
            ExitCode::SUCCESS
        }
        Err(RegisterError::Validation(errors)) => {
            for e in errors {
                eprintln!("{}: {}", e.field, e.message);
            }
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn student_dashboard(api: &ApiClient, session: &mut SessionStore) -> ExitCode {
    let greeting = greeting(session);
    let screen = Screen::new();
    let Some(vm) = StudentDashboard::load(api, session, &screen).await else {
        return ExitCode::SUCCESS;
    };

    println!("Hi {greeting}, ready for class?");
    print_banner(&vm);

    println!("\nThis week");
    for (day, classes) in timetable(&vm.data) {
        println!("  {day}");
        for class in classes {
            let schedule = class.schedule.as_ref().cloned().unwrap_or_default();
            println!(
                "    {}-{}  {}  {}  ({}, {})",
                schedule.start, schedule.end, class.code, class.name, schedule.room, class.lecturer,
            );
        }
    }

    println!("\nGrades");
    for class in &vm.data {
        println!("  {}  {}", class.code, show_grades(&class.grades));
    }

    ExitCode::SUCCESS
}

async fn lecturer_dashboard(api: &ApiClient, session: &mut SessionStore) -> ExitCode {
    let greeting = greeting(session);
    let screen = Screen::new();
    let Some(vm) = LecturerDashboard::load(api, session, &screen).await else {
        return ExitCode::SUCCESS;
    };

    println!("Good day, {greeting}");
    print_banner(&vm);

    println!("\nYour courses");
    for course in &vm.data {
        print_course(course);
    }

    ExitCode::SUCCESS
}

async fn course_detail(api: &ApiClient, session: &mut SessionStore, course_id: &str) -> ExitCode {
    let screen = Screen::new();
    let Some(vm) = CourseDetail::load(api, session, &screen, course_id).await else {
        return ExitCode::SUCCESS;
    };

    println!("Course {course_id}");
    print_banner(&vm);

    println!("\nEnrolled students");
    print_roster(&vm.data);

    ExitCode::SUCCESS
}

async fn enter_grades(
    api: &ApiClient,
    session: &mut SessionStore,
    course_id: &str,
    student_id: &str,
    inputs: [(GradeField, Option<String>); 3],
) -> ExitCode {
    // same gate as opening the course page
    match routes::resolve(&Route::Course(course_id.to_string()), session.user()) {
        Resolution::Render(_) => {}
        Resolution::RedirectToLogin { from } => {
            println!("Not logged in (requested {from}).");
            return ExitCode::FAILURE;
        }
        Resolution::Redirect(_) => {
            eprintln!("only lecturers can enter grades");
            return ExitCode::FAILURE;
        }
    }

    let screen = Screen::new();
    let Some(vm) = CourseDetail::load(api, session, &screen, course_id).await else {
        return ExitCode::SUCCESS;
    };
    print_banner(&vm);

    let mut students = vm.data;
    let Some(student) = students.iter_mut().find(|s| s.id == student_id) else {
        eprintln!("no student {student_id} on course {course_id}");
        return ExitCode::FAILURE;
    };

    let mut editor = GradeEditor::new();
    for (field, value) in inputs {
        if let Some(raw) = value {
            debug!("{student_id} {} input: {raw:?}", field.name());
            editor.record_input(student_id, field, &raw);
        }
    }

    let outcome = editor.save(api, session, course_id, student).await;
    println!("{}", outcome.status);
    println!("{}: {}", student.name, show_grades(&student.grades));

    ExitCode::SUCCESS
}

fn greeting(session: &SessionStore) -> String {
    session
        .user()
        .map(|u| u.display_name().to_string())
        .unwrap_or_else(|| "there".to_string())
}

fn print_banner<T>(vm: &ViewModel<T>) {
    if let Some(banner) = vm.banner {
        println!("! {banner}");
    }
}

fn print_course(course: &CourseRecord) {
    println!("  {}  {}", course.code, course.name);

    let mut details = Vec::new();
    if !course.room.is_empty() {
        details.push(format!("Room {}", course.room));
    }
    if !course.next_session.is_empty() {
        details.push(format!("Next session {}", course.next_session));
    }
    details.push(format!("Enrolled students: {}", course.students.count()));
    println!("    {}  [{}]", details.join(" · "), course.id);
}

fn print_roster(students: &[StudentRecord]) {
    for student in students {
        println!("  {}  <{}>", student.name, student.email);
        println!("    {}", show_grades(&student.grades));
    }
}

fn show_grades(grades: &GradeSet) -> String {
    format!(
        "classwork {}  midterm {}  finals {}",
        format_score(grades.classwork),
        format_score(grades.midterm),
        format_score(grades.finals),
    )
}

fn prompt_password() -> io::Result<String> {
    print!("Password: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;

    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
