//! Terminal rendering of the derived views.

use colored::{ColoredString, Colorize};

use roadmap_core::views::{
    self, tier_label, BacklogSummary, DependencyReport, OrgOverview, ScheduleGrid, ValueMatrix,
};
use roadmap_core::{AiInsight, Phase, Quarter, RequestItem, RoleProfile, WorkspaceMode};

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let cut: String = text.chars().take(width.saturating_sub(1)).collect();
    format!("{}…", cut)
}

fn short_id(id: &str) -> &str {
    id.get(..4).unwrap_or(id)
}

pub fn print_mode_banner(mode: WorkspaceMode) {
    match mode {
        WorkspaceMode::Live => println!("{}", " LIVE ".on_blue().white().bold()),
        WorkspaceMode::Draft => {
            println!("{}", " DRAFT WORKSPACE ".on_yellow().black().bold());
            println!(
                "{}",
                "You are working on a DRAFT version. Changes are NOT permanent until published."
                    .yellow()
            );
        }
    }
}

pub fn print_summary(summary: &BacklogSummary) {
    println!("{}", summary_line(summary));
}

fn summary_line(summary: &BacklogSummary) -> String {
    format!(
        "{} {:.0}   {} {}   {} {} MD   {} {}   {} {}",
        "Strategic Value:".bold(),
        summary.strategic_value,
        "Initiatives:".bold(),
        summary.initiatives,
        "Resource Burden:".bold(),
        summary.resource_burden,
        "Node Presence:".bold(),
        summary.node_presence,
        "Stakeholder Reach:".bold(),
        summary.stakeholder_reach,
    )
}

pub fn print_backlog(requests: &[RequestItem]) {
    println!("\n{}", "Master Backlog".bold().underline());
    if requests.is_empty() {
        println!("{}", "  No requests yet.".dimmed());
        return;
    }

    println!(
        "  {:<6} {:<42} {:<6} {:<6} {:>7} {:>4}",
        "ID".bold(),
        "Title".bold(),
        "A".bold(),
        "D".bold(),
        "Score".bold(),
        "Chat".bold()
    );
    for req in requests {
        println!(
            "  {:<6} {:<42} {:<6} {:<6} {:>7} {:>4}",
            short_id(&req.id).dimmed(),
            truncate(&req.title, 42),
            format!("A:{}", req.analysis_quarter).blue(),
            format!("D:{}", req.dev_quarter).magenta(),
            format!("{:.0}", req.score).cyan().bold(),
            req.messages.len(),
        );
    }
}

pub fn print_request(req: &RequestItem) {
    println!("\n{}", req.title.bold().underline());
    println!("  {} {}", "ID:".bold(), req.id);
    if !req.description.is_empty() {
        println!("  {}", req.description);
    }
    println!(
        "  {} reach {} x impact {} x confidence {:.0}% / effort {} MD = {}",
        "RICE:".bold(),
        req.metrics.reach,
        req.metrics.impact,
        req.metrics.confidence * 100.0,
        req.metrics.effort,
        format!("{:.1}", req.score).cyan().bold()
    );
    println!(
        "  {} analysis {}, dev {}, tier {}",
        "Schedule:".bold(),
        req.analysis_quarter,
        req.dev_quarter,
        tier_label(req.priority_tier)
    );
    println!("  {} {}", "Stakeholders:".bold(), join(req.stakeholders.iter()));
    println!("  {} {}", "Locations:".bold(), join(req.locations.iter()));
    println!("  {} {}", "Processes:".bold(), join(req.business_processes.iter()));
    if req.has_dependencies() {
        println!("  {} {}", "Dependent on:".bold(), req.blockers().join(", ").yellow());
    }

    println!("  {}", "Roles:".bold());
    for role in RoleProfile::all() {
        let md = req.effort_for(role);
        let needed = req.needed_roles.contains(&role);
        if md > 0.0 || needed {
            let marker = if needed { "[x]" } else { "[ ]" };
            println!("    {} {:<22} {} MD", marker, role.to_string(), md);
        }
    }
}

pub fn print_messages(req: &RequestItem) {
    println!("\n{} {}", "Initiative Chat:".bold(), req.title);
    if req.messages.is_empty() {
        println!("{}", "  No messages yet.".dimmed());
    }
    for msg in &req.messages {
        println!(
            "  {} {} {}",
            msg.timestamp.format("%Y-%m-%d %H:%M").to_string().dimmed(),
            msg.author.to_uppercase().blue().bold(),
            msg.text
        );
    }
}

fn join<'a>(values: impl Iterator<Item = &'a String>) -> String {
    let joined: Vec<&str> = values.map(String::as_str).collect();
    if joined.is_empty() {
        "-".to_string()
    } else {
        joined.join(", ")
    }
}

fn heat(value: f64, intensity: f64) -> ColoredString {
    let text = format!("{:>8.0}", value);
    if intensity > 0.8 {
        text.on_blue().white().bold()
    } else if intensity > 0.6 {
        text.blue().bold()
    } else if intensity > 0.4 {
        text.blue()
    } else if intensity > 0.2 {
        text.cyan()
    } else {
        text.normal()
    }
}

pub fn print_matrix(matrix: &ValueMatrix) {
    println!("\n{}", "Value Map (location x stakeholder)".bold().underline());
    if matrix.locations.is_empty() || matrix.stakeholders.is_empty() {
        println!("{}", "  No scoped requests yet.".dimmed());
        return;
    }

    print!("  {:<24}", "");
    for stake in &matrix.stakeholders {
        print!(" {:>8}", truncate(stake, 8).bold());
    }
    println!();
    for loc in &matrix.locations {
        print!("  {:<24}", truncate(loc, 24).bold());
        for stake in &matrix.stakeholders {
            match matrix.cell(loc, stake) {
                Some(value) => print!(" {}", heat(value, matrix.intensity(loc, stake))),
                None => print!(" {:>8}", "·".dimmed()),
            }
        }
        println!();
    }
}

pub fn print_cell_requests(requests: &[&RequestItem], location: &str, stakeholder: &str) {
    println!("\n{} {} / {}", "Requests in".bold(), location, stakeholder);
    for req in requests {
        println!("  {:>7}  {}", format!("{:.0}", req.score).cyan(), req.title);
    }
}

pub fn print_workload(requests: &[RequestItem]) {
    println!("\n{}", "Role Workload".bold().underline());
    let loads = views::role_workload(requests);
    let max = loads.iter().map(|l| l.mandays).fold(1.0, f64::max);
    for load in loads {
        let group = if load.role.is_business() { "BIZ" } else { "IT " };
        let bar = "█".repeat(((load.mandays / max) * 30.0).round() as usize);
        println!(
            "  {} {:<22} {:>6} MD {}",
            group.dimmed(),
            load.role.to_string(),
            load.mandays,
            bar.green()
        );
    }
}

pub fn print_balance(requests: &[RequestItem]) {
    println!("\n{}", "Strategic Balance (effort vs value)".bold().underline());
    for point in views::strategic_balance(requests) {
        let title = truncate(&point.title, 40);
        let line = format!(
            "  {:<40} effort {:>6} MD  value {:>7.1}  score {:>6.1}",
            title, point.effort, point.value_potential, point.score
        );
        if point.highlighted {
            println!("{}", line.magenta().bold());
        } else {
            println!("{}", line);
        }
    }
}

pub fn print_timeline(grid: &ScheduleGrid) {
    println!("\n{}", "Timeline".bold().underline());
    for (tier, cells) in grid.rows() {
        println!("{}", tier_label(tier).bold());
        for (quarter, entries) in Quarter::ALL.iter().zip(cells) {
            if entries.is_empty() {
                continue;
            }
            for entry in entries.iter() {
                let tag = match entry.phase {
                    Phase::Analysis => "Analysis".blue(),
                    Phase::Development => "Dev".magenta(),
                };
                println!(
                    "  {}  {:<9} {} {}",
                    quarter.to_string().bold(),
                    tag,
                    truncate(&entry.title, 48),
                    format!("#{}", short_id(&entry.request_id)).dimmed()
                );
            }
        }
    }
}

pub fn print_links(report: &DependencyReport) {
    println!("\n{}", "Dependency Map".bold().underline());
    println!(
        "  {} {}   {} {}   {} {:.0}",
        "Blocked:".bold(),
        report.blocked_count(),
        "Links:".bold(),
        report.total_links,
        "Unblocked value:".bold(),
        report.unblocked_value
    );
    if report.entries.is_empty() {
        println!("{}", "  No dependencies mapped yet.".dimmed());
        return;
    }
    for entry in &report.entries {
        println!("  {} [{}]", entry.title.bold(), entry.locations.join(", ").dimmed());
        for blocker in &entry.blockers {
            println!("    {} {}", "dependent on".yellow(), blocker);
        }
    }
}

pub fn print_org(overview: &OrgOverview) {
    println!("\n{}", "Big Picture".bold().underline());
    print!("  {:<28}", "");
    for name in &overview.team_names {
        print!(" {:>12}", truncate(name, 12).bold());
    }
    println!();
    for row in &overview.rows {
        let name = if row.platform_dependent {
            format!("{} *", row.name).blue().bold()
        } else {
            row.name.normal()
        };
        print!("  {:<28}", name);
        for assigned in &row.assigned {
            let mark = if *assigned { "●".green() } else { "·".dimmed() };
            print!(" {:>12}", mark);
        }
        println!();
    }
    if overview.rows.is_empty() {
        println!("{}", "  No org projects configured.".dimmed());
    }
    println!(
        "  {} {}   {} {}   {} {:.0}%",
        "Platform-dependent:".bold(),
        overview.platform_dependent_projects,
        "Projects:".bold(),
        overview.total_projects,
        "Team coverage:".bold(),
        overview.team_coverage_pct
    );
}

pub fn print_insight(insight: &AiInsight) {
    println!("\n{}", "Strategic Insight".bold().underline());
    println!("  {}", insight.summary);
    println!("\n  {}", "Recommendations".bold());
    for (i, rec) in insight.recommendations.iter().enumerate() {
        println!("    {}. {}", i + 1, rec);
    }
    println!("\n  {}", "Risks".bold().red());
    for risk in &insight.risks {
        println!("    - {}", risk);
    }
    if !insight.synergies.is_empty() {
        println!("\n  {}", "Synergies".bold().green());
        for group in &insight.synergies {
            println!(
                "    {} ({})",
                group.cluster_title.bold(),
                group.request_ids.join(", ")
            );
            println!("      {}", group.reasoning.dimmed());
        }
    }
}
