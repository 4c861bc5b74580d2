use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::api::DEFAULT_BASE_URL;

#[derive(Parser, Debug)]
pub struct Args {
    /// Base URL of the portal backend.
    #[arg(short, long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Where the logged-in session lives. By default
    /// uniportal/session.json under the platform data directory.
    #[arg(short, long)]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session_file(&self) -> PathBuf {
        self.session_file.clone().unwrap_or_else(|| {
            let mut path = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
            path.push("uniportal");
            path.push("session.json");
            path
        })
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and store the session.
    Login {
        username_or_email: String,

        /// Read from stdin when omitted.
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Create an account with your campus email.
    Register {
        #[arg(long)]
        email: String,

        #[arg(long)]
        username: String,

        #[arg(long)]
        full_name: String,

        #[arg(long)]
        password: String,

        #[arg(long)]
        password_confirmation: String,

        /// Optional.
        #[arg(long, default_value = "")]
        major: String,
    },

    /// Open a portal route by path, e.g. /dashboard/student.
    Open { path: String },

    /// Open your role's dashboard.
    Dashboard,

    /// Open a course roster.
    Course { course_id: String },

    /// Enter grades for one student on a course.
    Grades {
        course_id: String,
        student_id: String,

        #[arg(long)]
        classwork: Option<String>,

        #[arg(long)]
        midterm: Option<String>,

        #[arg(long)]
        finals: Option<String>,
    },

    /// Log out and delete the stored session.
    Logout,
}
