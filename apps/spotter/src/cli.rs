use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::warn;

use crate::config::Config;
use crate::criteria::{Criteria, FULL_WEIGHT};
use crate::files::FileSet;
use crate::results::render_session;
use crate::scoring_client::HttpScoringClient;
use crate::server;
use crate::session::Session;
use crate::submission::SubmissionState;

#[derive(Parser, Debug)]
#[command(
    name = "spotter",
    about = "Shortlist resumes against weighted hiring criteria",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Submit resumes and criteria to the scoring service and print the shortlist
    Submit(SubmitArgs),
    /// Run the reference scoring service
    Serve(ServeArgs),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkillArg {
    pub name: String,
    pub weight: i64,
}

fn parse_skill(value: &str) -> Result<SkillArg, String> {
    let (name, weight) = value
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=WEIGHT, got '{value}'"))?;
    let weight = weight
        .trim()
        .parse::<i64>()
        .map_err(|_| format!("weight in '{value}' is not a whole number"))?;
    Ok(SkillArg {
        name: name.to_string(),
        weight,
    })
}

#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// Required months of experience
    #[arg(long, value_name = "MONTHS", default_value = "")]
    pub experience: String,
    /// Skill with its percentage weight; weights must total exactly 100
    #[arg(long = "skill", value_name = "NAME=WEIGHT", value_parser = parse_skill)]
    pub skills: Vec<SkillArg>,
    /// Required project, repeatable
    #[arg(long = "project", value_name = "NAME")]
    pub projects: Vec<String>,
    /// Number of resumes to shortlist
    #[arg(long, value_name = "N", default_value = "")]
    pub shortlist: String,
    /// Override the configured scoring service endpoint
    #[arg(long)]
    pub endpoint: Option<String>,
    /// Resume files to analyze
    pub files: Vec<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,
    /// Override the configured port
    #[arg(long)]
    pub port: Option<u16>,
}

pub async fn run(cli: Cli, config: Config) -> Result<ExitCode> {
    match cli.command {
        Command::Submit(args) => run_submit(args, config).await,
        Command::Serve(args) => server::run(args, config).await.map(|_| ExitCode::SUCCESS),
    }
}

/// Replays the command-line criteria as edits: the first skill and project
/// fill the blank entries every criteria set starts with.
pub fn apply_criteria(criteria: &mut Criteria, args: &SubmitArgs) {
    criteria.set_required_experience_months(args.experience.as_str());
    criteria.set_num_shortlist(args.shortlist.as_str());

    for (i, skill) in args.skills.iter().enumerate() {
        let index = if i == 0 { 0 } else { criteria.add_skill() };
        criteria.update_skill_name(index, skill.name.as_str());
        criteria.update_skill_weight(index, skill.weight);

        let requested = skill.weight.clamp(0, i64::from(FULL_WEIGHT)) as u32;
        if criteria.skills()[index].weight != requested {
            warn!(
                "Weight {}% for '{}' not applied: total would exceed 100%",
                requested, skill.name
            );
        }
    }

    for (i, project) in args.projects.iter().enumerate() {
        let index = if i == 0 { 0 } else { criteria.add_project() };
        criteria.update_project_name(index, project.as_str());
    }
}

async fn run_submit(args: SubmitArgs, config: Config) -> Result<ExitCode> {
    let mut session = Session::new();
    session.files = FileSet::load(&args.files).await?;
    apply_criteria(&mut session.criteria, &args);

    if let Err(blocked) = session.check() {
        println!("{}", render_session(&session));
        eprintln!("Cannot analyze resumes: {blocked}");
        return Ok(ExitCode::FAILURE);
    }

    let endpoint = args.endpoint.unwrap_or(config.scoring_service_url);
    let client = HttpScoringClient::new(endpoint);
    session.submit(&client).await?;

    println!("{}", render_session(&session));
    Ok(match session.submission().state() {
        SubmissionState::Complete(_) => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::build_router;
    use crate::screening::extract::PdfTextReader;
    use crate::state::AppState;
    use std::sync::Arc;

    fn submit_args(argv: &[&str]) -> SubmitArgs {
        let mut full = vec!["spotter", "submit"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Command::Submit(args) => args,
            other => panic!("expected submit, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_skill_splits_on_last_equals() {
        assert_eq!(
            parse_skill("C=C++=40").unwrap(),
            SkillArg {
                name: "C=C++".into(),
                weight: 40
            }
        );
        assert!(parse_skill("Rust").is_err());
        assert!(parse_skill("Rust=lots").is_err());
    }

    #[test]
    fn test_apply_criteria_replays_edits_in_order() {
        let args = submit_args(&[
            "--experience",
            "24",
            "--skill",
            "Python=60",
            "--skill",
            "Go=40",
            "--project",
            "compiler",
            "--project",
            "search engine",
            "--shortlist",
            "2",
            "a.pdf",
        ]);
        let mut criteria = Criteria::new();
        apply_criteria(&mut criteria, &args);

        let skills: Vec<_> = criteria
            .skills()
            .iter()
            .map(|s| (s.name.as_str(), s.weight))
            .collect();
        assert_eq!(skills, vec![("Python", 60), ("Go", 40)]);
        assert_eq!(criteria.projects().len(), 2);
        assert_eq!(criteria.num_shortlist().value(), Some(2));
        assert_eq!(args.files, vec![PathBuf::from("a.pdf")]);
    }

    #[test]
    fn test_overflowing_skill_keeps_zero_weight() {
        let args = submit_args(&["--skill", "Rust=80", "--skill", "Go=30"]);
        let mut criteria = Criteria::new();
        apply_criteria(&mut criteria, &args);
        assert_eq!(criteria.skills()[1].weight, 0);
        assert_eq!(criteria.total_weight(), 80);
    }

    #[test]
    fn test_serve_accepts_port_override() {
        match Cli::try_parse_from(["spotter", "serve", "--port", "8081"])
            .unwrap()
            .command
        {
            Command::Serve(args) => {
                assert_eq!(args.port, Some(8081));
                assert_eq!(args.host, "127.0.0.1");
            }
            other => panic!("expected serve, got {other:?}"),
        }
    }

    async fn spawn_service() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = build_router(AppState {
            config: Config::default(),
            reader: Arc::new(PdfTextReader),
        });
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/upload")
    }

    async fn resume_on_disk(test: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("spotter-cli-{test}-{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("ada.txt");
        tokio::fs::write(&path, "Ada\nExperience\nJan 2020 - Jan 2022\nSkills\nRust")
            .await
            .unwrap();
        path
    }

    fn ready_args(endpoint: &str, resume: &std::path::Path) -> SubmitArgs {
        submit_args(&[
            "--experience",
            "12",
            "--skill",
            "Rust=100",
            "--shortlist",
            "1",
            "--endpoint",
            endpoint,
            resume.to_str().unwrap(),
        ])
    }

    #[tokio::test]
    async fn test_submit_exits_zero_on_complete() {
        let resume = resume_on_disk("complete").await;
        let args = ready_args(&spawn_service().await, &resume);

        let code = run_submit(args, Config::default()).await.unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
    }

    #[tokio::test]
    async fn test_submit_exits_nonzero_when_service_is_unreachable() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let resume = resume_on_disk("refused").await;
        let args = ready_args(&format!("http://{addr}/upload"), &resume);

        let code = run_submit(args, Config::default()).await.unwrap();
        assert_eq!(code, ExitCode::FAILURE);
    }

    #[tokio::test]
    async fn test_submit_exits_nonzero_when_blocked() {
        let resume = resume_on_disk("blocked").await;
        let args = submit_args(&[
            "--experience",
            "12",
            "--skill",
            "Rust=60",
            "--shortlist",
            "1",
            resume.to_str().unwrap(),
        ]);

        let code = run_submit(args, Config::default()).await.unwrap();
        assert_eq!(code, ExitCode::FAILURE);
    }
}
