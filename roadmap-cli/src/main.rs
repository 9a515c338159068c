use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use inquire::{Confirm, InquireError, Select, Text};
use log::debug;
use std::fmt;

use roadmap_core::views::{self, ValueMatrix};
use roadmap_core::{
    default_config_path, AiError, AnalysisStatus, ChatMessage, NameList, ProjectDraft,
    RequestItem, RoadmapConfig, Transition, WorkspaceMode,
};

mod cli;
mod prompts;
mod render;
mod session;

use cli::{Cli, Command, ReportView};
use prompts::InquireConfirm;
use session::Session;

const ANALYSIS_FAILED: &str = "Strategic analysis failed. Check the AI CLI setup and try again.";

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match cli.command {
        Some(Command::InitConfig { path, force }) => {
            let path = match path {
                Some(path) => path,
                None => default_config_path()?,
            };
            RoadmapConfig::write_default(&path, force)?;
            println!("{} {}", "Config written to".green(), path.display());
            Ok(())
        }
        Some(Command::Report { view }) => {
            let session = load_session(&cli.config, cli.planner, cli.empty)?;
            print_report(&session, view);
            Ok(())
        }
        Some(Command::Analyze) => {
            let mut session = load_session(&cli.config, cli.planner, cli.empty)?;
            run_analysis_blocking(&mut session)
        }
        Some(Command::Shell) | None => {
            let mut session = load_session(&cli.config, cli.planner, cli.empty)?;
            run_shell(&mut session)
        }
    }
}

fn load_session(
    config_path: &Option<std::path::PathBuf>,
    planner: Option<String>,
    empty: bool,
) -> Result<Session> {
    let config = RoadmapConfig::resolve(config_path.as_deref())?;
    Ok(Session::from_config(&config, planner, empty))
}

fn print_report(session: &Session, view: ReportView) {
    let repo = session.workspace.active();
    let all = view == ReportView::All;

    if all || view == ReportView::Backlog {
        render::print_summary(&views::backlog_summary(repo));
        render::print_backlog(repo.requests());
    }
    if all || view == ReportView::Matrix {
        render::print_matrix(&views::value_matrix(repo.requests()));
    }
    if all || view == ReportView::Workload {
        render::print_workload(repo.requests());
        render::print_balance(repo.requests());
    }
    if all || view == ReportView::Timeline {
        render::print_timeline(&views::scheduling_grid(repo.requests()));
    }
    if all || view == ReportView::Links {
        render::print_links(&views::dependency_report(repo.requests()));
    }
    if all || view == ReportView::Org {
        render::print_org(&views::org_overview(&session.registry));
    }
}

fn run_analysis_blocking(session: &mut Session) -> Result<()> {
    println!("{} {}", "AI mode:".bold(), session.ai_description);
    session.insights.start(session.workspace.snapshot())?;
    match session.insights.wait().clone() {
        AnalysisStatus::Ready => {
            if let Some(insight) = session.insights.latest() {
                render::print_insight(insight);
            }
            Ok(())
        }
        _ => anyhow::bail!(ANALYSIS_FAILED),
    }
}

/// Entries of the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    Backlog,
    ViewRequest,
    AddRequest,
    EditRequest,
    EditRoles,
    DeleteRequest,
    Chat,
    Reschedule,
    ValueMap,
    Workload,
    Timeline,
    Dependencies,
    BigPicture,
    OrgConfig,
    RunAnalysis,
    ShowAnalysis,
    EnterDraft,
    EnterLive,
    Publish,
    Discard,
    Quit,
}

impl fmt::Display for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MenuAction::Backlog => "Show backlog",
            MenuAction::ViewRequest => "Show request details",
            MenuAction::AddRequest => "Add request",
            MenuAction::EditRequest => "Edit request",
            MenuAction::EditRoles => "Edit role estimates",
            MenuAction::DeleteRequest => "Delete request",
            MenuAction::Chat => "Initiative chat",
            MenuAction::Reschedule => "Move on timeline",
            MenuAction::ValueMap => "Value map",
            MenuAction::Workload => "Role workload and balance",
            MenuAction::Timeline => "Timeline",
            MenuAction::Dependencies => "Dependency map",
            MenuAction::BigPicture => "Big picture",
            MenuAction::OrgConfig => "Org configuration",
            MenuAction::RunAnalysis => "Run strategic analysis",
            MenuAction::ShowAnalysis => "Show strategic insight",
            MenuAction::EnterDraft => "Switch to draft workspace",
            MenuAction::EnterLive => "Switch to live roadmap",
            MenuAction::Publish => "Publish draft",
            MenuAction::Discard => "Discard draft changes",
            MenuAction::Quit => "Quit",
        };
        write!(f, "{}", label)
    }
}

fn menu_for(mode: WorkspaceMode) -> Vec<MenuAction> {
    let mut actions = vec![
        MenuAction::Backlog,
        MenuAction::ViewRequest,
        MenuAction::AddRequest,
        MenuAction::EditRequest,
        MenuAction::EditRoles,
        MenuAction::DeleteRequest,
        MenuAction::Chat,
        MenuAction::Reschedule,
        MenuAction::ValueMap,
        MenuAction::Workload,
        MenuAction::Timeline,
        MenuAction::Dependencies,
        MenuAction::BigPicture,
        MenuAction::OrgConfig,
        MenuAction::RunAnalysis,
        MenuAction::ShowAnalysis,
    ];
    match mode {
        WorkspaceMode::Live => actions.push(MenuAction::EnterDraft),
        WorkspaceMode::Draft => actions.extend([
            MenuAction::Publish,
            MenuAction::Discard,
            MenuAction::EnterLive,
        ]),
    }
    actions.push(MenuAction::Quit);
    actions
}

fn is_cancellation(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<InquireError>(),
        Some(InquireError::OperationCanceled) | Some(InquireError::OperationInterrupted)
    )
}

fn run_shell(session: &mut Session) -> Result<()> {
    println!("{}", "RICE Roadmap Planner".bold());
    println!("{} {}", "AI mode:".dimmed(), session.ai_description.dimmed());

    loop {
        report_finished_analysis(session);

        println!();
        render::print_mode_banner(session.workspace.mode());
        render::print_summary(&views::backlog_summary(session.workspace.active()));

        let action = match Select::new("Action:", menu_for(session.workspace.mode())).prompt() {
            Ok(action) => action,
            Err(InquireError::OperationCanceled) | Err(InquireError::OperationInterrupted) => {
                break;
            }
            Err(e) => return Err(e.into()),
        };

        if action == MenuAction::Quit {
            break;
        }

        if let Err(e) = handle_action(session, action) {
            if is_cancellation(&e) {
                println!("{}", "Cancelled".dimmed());
            } else {
                eprintln!("{} {}", "Error:".red().bold(), e);
            }
        }
    }

    Ok(())
}

/// Prints a one-time notice when a background analysis has just completed
fn report_finished_analysis(session: &mut Session) {
    if !session.insights.is_running() {
        return;
    }
    match session.insights.poll() {
        AnalysisStatus::Ready => println!(
            "{}",
            "Strategic analysis ready. Choose \"Show strategic insight\".".green()
        ),
        AnalysisStatus::Failed(_) => println!("{}", ANALYSIS_FAILED.red()),
        AnalysisStatus::Running | AnalysisStatus::Idle => {}
    }
}

fn handle_action(session: &mut Session, action: MenuAction) -> Result<()> {
    debug!("Menu action: {:?}", action);
    match action {
        MenuAction::Backlog => {
            render::print_backlog(session.workspace.active().requests());
        }
        MenuAction::ViewRequest => {
            if let Some(id) = select_request(session, "Select a request:")? {
                if let Some(req) = session.workspace.active().get(&id) {
                    render::print_request(req);
                }
            }
        }
        MenuAction::AddRequest => add_request(session)?,
        MenuAction::EditRequest => edit_request(session)?,
        MenuAction::EditRoles => edit_roles(session)?,
        MenuAction::DeleteRequest => delete_request(session)?,
        MenuAction::Chat => chat(session)?,
        MenuAction::Reschedule => reschedule(session)?,
        MenuAction::ValueMap => value_map(session)?,
        MenuAction::Workload => {
            let requests = session.workspace.active().requests();
            render::print_workload(requests);
            render::print_balance(requests);
        }
        MenuAction::Timeline => {
            render::print_timeline(&views::scheduling_grid(
                session.workspace.active().requests(),
            ));
        }
        MenuAction::Dependencies => {
            render::print_links(&views::dependency_report(
                session.workspace.active().requests(),
            ));
        }
        MenuAction::BigPicture => {
            render::print_org(&views::org_overview(&session.registry));
        }
        MenuAction::OrgConfig => org_config(session)?,
        MenuAction::RunAnalysis => {
            match session.insights.start(session.workspace.snapshot()) {
                Ok(()) => println!("{}", "Strategic analysis started in the background.".cyan()),
                Err(AiError::Busy) => println!("{}", "An analysis is already running.".yellow()),
                Err(e) => return Err(e.into()),
            }
        }
        MenuAction::ShowAnalysis => show_analysis(session),
        MenuAction::EnterDraft => session.workspace.enter_draft(),
        MenuAction::EnterLive => session.workspace.enter_live(),
        MenuAction::Publish => {
            if session.workspace.publish(&InquireConfirm) == Transition::Applied {
                println!("{}", "Draft published to the live roadmap.".green());
            }
        }
        MenuAction::Discard => {
            if session.workspace.discard_draft(&InquireConfirm) == Transition::Applied {
                println!("{}", "Draft reset to the live roadmap.".green());
            }
        }
        MenuAction::Quit => {}
    }
    Ok(())
}

fn select_request(session: &Session, message: &str) -> Result<Option<String>> {
    let selected = prompts::prompt_select_request(session.workspace.active().requests(), message)?;
    if selected.is_none() {
        println!("{}", "No requests in the backlog.".yellow());
    }
    Ok(selected)
}

fn add_request(session: &mut Session) -> Result<()> {
    let template = RequestItem::new(String::new());
    let patch = prompts::prompt_request_form(&template, &session.registry)?;
    if patch.title.as_deref().map_or(true, |t| t.trim().is_empty()) {
        println!("{}", "A title is required.".yellow());
        return Ok(());
    }

    let created = session.workspace.active_mut().create(patch);
    println!(
        "{} {} (score {:.1})",
        "Added".green(),
        created.title,
        created.score
    );
    Ok(())
}

fn edit_request(session: &mut Session) -> Result<()> {
    let Some(id) = select_request(session, "Request to edit:")? else {
        return Ok(());
    };
    let Some(current) = session.workspace.active().get(&id).cloned() else {
        return Ok(());
    };

    let patch = prompts::prompt_request_form(&current, &session.registry)?;
    if session.workspace.active_mut().update(&id, patch) {
        if let Some(req) = session.workspace.active().get(&id) {
            println!("{} {} (score {:.1})", "Updated".green(), req.title, req.score);
        }
    }
    Ok(())
}

fn edit_roles(session: &mut Session) -> Result<()> {
    let Some(id) = select_request(session, "Request:")? else {
        return Ok(());
    };
    let Some(current) = session.workspace.active().get(&id).cloned() else {
        return Ok(());
    };

    let efforts = prompts::prompt_role_efforts(&current)?;
    session.workspace.active_mut().edit(&id, |req| {
        for (role, md) in efforts {
            req.set_role_effort(role, md);
        }
    });
    if let Some(req) = session.workspace.active().get(&id) {
        render::print_request(req);
    }
    Ok(())
}

fn delete_request(session: &mut Session) -> Result<()> {
    let Some(id) = select_request(session, "Request to delete:")? else {
        return Ok(());
    };

    let confirm = Confirm::new("Are you sure you want to delete this request?")
        .with_default(false)
        .prompt()?;
    if confirm && session.workspace.active_mut().delete(&id) {
        println!("{}", "Request deleted.".green());
    }
    Ok(())
}

fn chat(session: &mut Session) -> Result<()> {
    let Some(id) = select_request(session, "Request:")? else {
        return Ok(());
    };
    if let Some(req) = session.workspace.active().get(&id) {
        render::print_messages(req);
    }

    let text = Text::new("Message (empty to skip):").prompt()?;
    let text = text.trim();
    if text.is_empty() {
        return Ok(());
    }

    let message = ChatMessage::new(session.planner.clone(), text);
    session.workspace.active_mut().append_message(&id, message);
    Ok(())
}

fn reschedule(session: &mut Session) -> Result<()> {
    let Some(id) = select_request(session, "Request to move:")? else {
        return Ok(());
    };
    let Some(current) = session.workspace.active().get(&id).cloned() else {
        return Ok(());
    };

    let (phase, quarter, tier) = prompts::prompt_reschedule(&current)?;
    session
        .workspace
        .active_mut()
        .reschedule(&id, phase, quarter, tier);
    render::print_timeline(&views::scheduling_grid(
        session.workspace.active().requests(),
    ));
    Ok(())
}

fn value_map(session: &Session) -> Result<()> {
    let requests = session.workspace.active().requests();
    let matrix = views::value_matrix(requests);
    render::print_matrix(&matrix);
    if matrix.is_empty() {
        return Ok(());
    }

    if !Confirm::new("Drill into a cell?").with_default(false).prompt()? {
        return Ok(());
    }
    let cells: Vec<(String, String)> = matrix
        .cells()
        .map(|(loc, stake, _)| (loc.to_string(), stake.to_string()))
        .collect();
    let labels = cells
        .iter()
        .map(|(loc, stake)| format!("{} / {}", loc, stake))
        .collect();
    if let Some(index) = prompts::prompt_select_index("Cell:", labels)? {
        let (loc, stake) = &cells[index];
        render::print_cell_requests(&ValueMatrix::drill_down(requests, loc, stake), loc, stake);
    }
    Ok(())
}

fn show_analysis(session: &mut Session) {
    match session.insights.poll() {
        AnalysisStatus::Running => println!("{}", "Analysis still running...".cyan()),
        AnalysisStatus::Failed(_) => println!("{}", ANALYSIS_FAILED.red()),
        AnalysisStatus::Idle | AnalysisStatus::Ready => {}
    }
    match session.insights.latest() {
        Some(insight) => render::print_insight(insight),
        None => println!("{}", "No strategic insight yet.".dimmed()),
    }
}

/// Org configuration sections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OrgSection {
    Stakeholders,
    Locations,
    BusinessProcesses,
    Teams,
    Projects,
    Back,
}

impl fmt::Display for OrgSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OrgSection::Stakeholders => "Stakeholders",
            OrgSection::Locations => "Locations",
            OrgSection::BusinessProcesses => "Business processes",
            OrgSection::Teams => "Teams",
            OrgSection::Projects => "Projects",
            OrgSection::Back => "Back",
        };
        write!(f, "{}", label)
    }
}

fn org_config(session: &mut Session) -> Result<()> {
    let sections = vec![
        OrgSection::Stakeholders,
        OrgSection::Locations,
        OrgSection::BusinessProcesses,
        OrgSection::Teams,
        OrgSection::Projects,
        OrgSection::Back,
    ];
    let section = Select::new("Configure:", sections).prompt()?;
    match section {
        OrgSection::Stakeholders => edit_name_list("Stakeholder", &mut session.registry.stakeholders),
        OrgSection::Locations => edit_name_list("Location", &mut session.registry.locations),
        OrgSection::BusinessProcesses => {
            edit_name_list("Business process", &mut session.registry.business_processes)
        }
        OrgSection::Teams => edit_teams(session),
        OrgSection::Projects => edit_projects(session),
        OrgSection::Back => Ok(()),
    }
}

fn edit_name_list(kind: &str, list: &mut NameList) -> Result<()> {
    println!("\n{}", format!("{}s", kind).bold());
    for name in list.iter() {
        println!("  {}", name);
    }

    let choice = Select::new("Action:", vec!["Add", "Remove", "Back"]).prompt()?;
    match choice {
        "Add" => {
            let name = Text::new(&format!("{} name:", kind)).prompt()?;
            if !list.add(&name) {
                println!("{}", "Blank names are ignored.".yellow());
            }
        }
        "Remove" => {
            let labels = list.iter().map(str::to_string).collect();
            if let Some(index) = prompts::prompt_select_index("Remove:", labels)? {
                list.remove_at(index);
            }
        }
        _ => {}
    }
    Ok(())
}

fn edit_teams(session: &mut Session) -> Result<()> {
    let registry = &mut session.registry;
    println!("\n{}", "Teams".bold());
    for team in registry.teams() {
        println!("  {}", team.name);
    }

    let choice = Select::new("Action:", vec!["Add", "Rename", "Remove", "Back"]).prompt()?;
    let team_labels: Vec<String> = registry.teams().iter().map(|t| t.name.clone()).collect();
    match choice {
        "Add" => {
            let name = Text::new("Team name:").prompt()?;
            if registry.add_team(&name).is_none() {
                println!("{}", "Blank names are ignored.".yellow());
            }
        }
        "Rename" => {
            if let Some(index) = prompts::prompt_select_index("Team:", team_labels.clone())? {
                let id = registry.teams()[index].id.clone();
                let current = registry.teams()[index].name.clone();
                let name = Text::new("New name:").with_initial_value(&current).prompt()?;
                registry.rename_team(&id, &name);
            }
        }
        "Remove" => {
            if let Some(index) = prompts::prompt_select_index("Team:", team_labels.clone())? {
                let id = registry.teams()[index].id.clone();
                registry.remove_team(&id);
            }
        }
        _ => {}
    }
    Ok(())
}

fn edit_projects(session: &mut Session) -> Result<()> {
    let registry = &mut session.registry;
    println!("\n{}", "Projects".bold());
    for project in registry.projects() {
        let teams: Vec<&str> = project
            .assigned_team_ids
            .iter()
            .map(|id| registry.team_name(id))
            .collect();
        println!("  {} [{}]", project.name, teams.join(", ").dimmed());
    }

    let choice = Select::new("Action:", vec!["Add", "Edit", "Remove", "Back"]).prompt()?;
    match choice {
        "Add" => {
            let draft = prompts::prompt_project(registry, ProjectDraft::default())?;
            if registry.add_project(draft).is_none() {
                println!("{}", "A project name is required.".yellow());
            }
        }
        "Edit" => {
            let labels = registry.projects().iter().map(|p| p.name.clone()).collect();
            if let Some(index) = prompts::prompt_select_index("Project:", labels)? {
                let project = &registry.projects()[index];
                let id = project.id.clone();
                let draft = prompts::prompt_project(registry, ProjectDraft::from(project))?;
                registry.update_project(&id, draft);
            }
        }
        "Remove" => {
            let labels = registry.projects().iter().map(|p| p.name.clone()).collect();
            if let Some(index) = prompts::prompt_select_index("Project:", labels)? {
                let id = registry.projects()[index].id.clone();
                registry.remove_project(&id);
            }
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_depends_on_mode() {
        let live = menu_for(WorkspaceMode::Live);
        assert!(live.contains(&MenuAction::EnterDraft));
        assert!(!live.contains(&MenuAction::Publish));

        let draft = menu_for(WorkspaceMode::Draft);
        assert!(draft.contains(&MenuAction::Publish));
        assert!(draft.contains(&MenuAction::Discard));
        assert!(!draft.contains(&MenuAction::EnterDraft));
        assert_eq!(draft.last(), Some(&MenuAction::Quit));
    }

    #[test]
    fn test_cancellation_detection() {
        let cancelled: anyhow::Error = InquireError::OperationCanceled.into();
        assert!(is_cancellation(&cancelled));
        assert!(!is_cancellation(&anyhow::anyhow!("boom")));
    }
}
