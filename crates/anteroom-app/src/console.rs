// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Interactive admin console.
//
// Line-oriented front end over the credential gate and the request registry:
// sign in, review signup requests, decide them, or file a new one.  Every
// typed command refreshes the session's activity clock.

use std::io::Write as _;

use anteroom_core::error::{AnteroomError, Result};
use anteroom_core::human_errors::{humanize_error, Severity};
use anteroom_core::{RequestDraft, RequestFilter, RequestId, ServiceCategory, SignupRequest};
use chrono::{DateTime, Utc};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{debug, info, warn};

use crate::services::app_services::AppServices;

type InputLines = Lines<BufReader<Stdin>>;

/// Run the console until `quit` or end of input.
pub async fn run(services: AppServices) -> Result<()> {
    print_banner(&services);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt(services.gate().is_session_valid())?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        // Any typed command counts as admin activity.
        services.gate().update_activity();

        let (command, arg) = split_command(input);
        match command {
            "help" => print_help(),
            "login" => handle_login(&services, &mut lines).await?,
            "logout" => handle_logout(&services),
            "status" => handle_status(&services),
            "list" => handle_list(&services, arg),
            "show" => handle_show(&services, arg),
            "approve" => handle_approve(&services, arg),
            "reject" => handle_reject(&services, arg),
            "remove" => handle_remove(&services, arg),
            "submit" => handle_submit(&services, &mut lines).await?,
            "quit" | "exit" => break,
            other => println!("Unknown command `{other}`. Type `help` for the list."),
        }
    }

    info!("console closed");
    Ok(())
}

fn split_command(input: &str) -> (&str, &str) {
    match input.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (input, ""),
    }
}

fn prompt(signed_in: bool) -> Result<()> {
    if signed_in {
        print!("anteroom (admin)> ");
    } else {
        print!("anteroom> ");
    }
    std::io::stdout().flush()?;
    Ok(())
}

/// Print `label` and read one trimmed line.  `None` means end of input.
async fn ask(lines: &mut InputLines, label: &str) -> Result<Option<String>> {
    print!("{label}");
    std::io::stdout().flush()?;
    let line = lines.next_line().await?;
    Ok(line.map(|answer| answer.trim().to_string()))
}

// -- Commands -----------------------------------------------------------------

async fn handle_login(services: &AppServices, lines: &mut InputLines) -> Result<()> {
    if services.gate().is_session_valid() {
        println!("Already signed in.");
        return Ok(());
    }

    let Some(username) = ask(lines, "Username: ").await? else {
        return Ok(());
    };
    // The password is taken exactly as typed, spaces included.
    print!("Password: ");
    std::io::stdout().flush()?;
    let Some(password) = lines.next_line().await? else {
        return Ok(());
    };

    match services.gate().authenticate(&username, &password) {
        Ok(outcome) => {
            println!("{}", outcome.message);
            if outcome.success {
                let stats = services.registry().stats();
                println!(
                    "{} pending of {} total signup requests.",
                    stats.pending, stats.total
                );
            }
        }
        Err(e) => report(&e),
    }
    Ok(())
}

fn handle_logout(services: &AppServices) {
    if services.gate().current_session().is_some() {
        services.gate().clear_session();
        println!("Logged out.");
    } else {
        println!("Not signed in.");
    }
}

fn handle_status(services: &AppServices) {
    match services.gate().current_session() {
        Some(session) => {
            let remaining = (session.expires_at - Utc::now()).num_minutes();
            println!("Signed in. Session expires in {remaining} min.");

            let stats = services.registry().stats();
            println!(
                "Requests: {} pending, {} approved, {} rejected ({} total).",
                stats.pending, stats.approved, stats.rejected, stats.total
            );
        }
        None => println!("Not signed in."),
    }

    match services.gate().is_login_locked() {
        Ok(status) if status.locked => {
            println!(
                "Login locked for {} more minute(s).",
                status.remaining_minutes
            );
        }
        Ok(_) => {}
        Err(e) => report(&e),
    }

    match services.data_dir() {
        Some(dir) => println!("Data directory: {}", dir.display()),
        None => println!("Running in memory only; nothing is saved."),
    }
}

fn handle_list(services: &AppServices, arg: &str) {
    if !require_session(services) {
        return;
    }
    let filter = if arg.is_empty() {
        RequestFilter::All
    } else {
        match RequestFilter::from_code(arg) {
            Some(filter) => filter,
            None => {
                println!("Unknown filter `{arg}`. Use pending, approved, rejected, or all.");
                return;
            }
        }
    };

    let requests = services.registry().filtered(filter);
    if requests.is_empty() {
        println!("No matching requests.");
        return;
    }
    for request in &requests {
        println!(
            "{}  {:<8}  {}  {} ({})",
            request.id,
            request.status.as_str(),
            format_date(request.submitted_at),
            request.full_name,
            request.category_label()
        );
    }
    println!("{} request(s).", requests.len());
}

fn handle_show(services: &AppServices, arg: &str) {
    if !require_session(services) {
        return;
    }
    let Some(id) = parse_id(arg) else {
        return;
    };
    match services.registry().get(&id) {
        Some(request) => print_request(&request),
        None => println!("No request with id {id}."),
    }
}

fn handle_approve(services: &AppServices, arg: &str) {
    if !require_session(services) {
        return;
    }
    let Some(id) = parse_id(arg) else {
        return;
    };
    match services.registry().approve(&id) {
        Ok(request) => println!("Approved {}'s request.", request.full_name),
        Err(e) => report(&e),
    }
}

fn handle_reject(services: &AppServices, arg: &str) {
    if !require_session(services) {
        return;
    }
    let Some(id) = parse_id(arg) else {
        return;
    };
    match services.registry().reject(&id) {
        Ok(request) => println!("Rejected {}'s request.", request.full_name),
        Err(e) => report(&e),
    }
}

fn handle_remove(services: &AppServices, arg: &str) {
    if !require_session(services) {
        return;
    }
    let Some(id) = parse_id(arg) else {
        return;
    };
    match services.registry().remove(&id) {
        Ok(()) => println!("Request removed."),
        Err(e) => report(&e),
    }
}

async fn handle_submit(services: &AppServices, lines: &mut InputLines) -> Result<()> {
    let Some(full_name) = ask(lines, "Full name: ").await? else {
        return Ok(());
    };
    let Some(email) = ask(lines, "Email: ").await? else {
        return Ok(());
    };
    let Some(phone) = ask(lines, "Phone (10-digit mobile): ").await? else {
        return Ok(());
    };
    let Some(code) =
        ask(lines, "Service (construction/food/travel/gst/marketing/it/other): ").await?
    else {
        return Ok(());
    };
    let Some(service_category) = ServiceCategory::from_code(&code) else {
        println!("Unknown service category `{code}`.");
        return Ok(());
    };
    let other_service = if service_category == ServiceCategory::Other {
        let Some(text) = ask(lines, "Describe the service: ").await? else {
            return Ok(());
        };
        Some(text)
    } else {
        None
    };
    let Some(years) = ask(lines, "Years of experience: ").await? else {
        return Ok(());
    };
    let Ok(experience_years) = years.parse() else {
        println!("`{years}` is not a number.");
        return Ok(());
    };
    let Some(location) = ask(lines, "Location: ").await? else {
        return Ok(());
    };
    let Some(description) = ask(lines, "What work are you looking for? ").await? else {
        return Ok(());
    };

    let draft = RequestDraft {
        full_name,
        email,
        phone,
        service_category,
        other_service,
        experience_years,
        location,
        description,
    };

    match services.registry().submit(draft) {
        Ok(request) => {
            println!("Thank you. Your request is recorded as {}.", request.id);
            let contact = &services.config().contact;
            println!("Questions? Reach us at {} or {}.", contact.phone, contact.email);
        }
        Err(e) => report(&e),
    }
    Ok(())
}

// -- Output helpers -----------------------------------------------------------

fn require_session(services: &AppServices) -> bool {
    if services.gate().is_session_valid() {
        true
    } else {
        println!("Not signed in. Use `login` first.");
        false
    }
}

fn parse_id(arg: &str) -> Option<RequestId> {
    if arg.is_empty() {
        println!("An id is required. Use `list` to see ids.");
        return None;
    }
    match arg.parse() {
        Ok(id) => Some(id),
        Err(_) => {
            println!("`{arg}` is not a valid request id.");
            None
        }
    }
}

fn print_request(request: &SignupRequest) {
    println!("Id:         {}", request.id);
    println!("Name:       {}", request.full_name);
    println!("Email:      {}", request.email);
    println!("Phone:      {}", request.phone);
    println!("Service:    {}", request.category_label());
    println!("Experience: {} years", request.experience_years);
    println!("Location:   {}", request.location);
    println!("About:      {}", request.description);
    println!("Status:     {}", request.status);
    println!("Submitted:  {}", format_date(request.submitted_at));
    if let Some(at) = request.approved_at {
        println!("Approved:   {}", format_date(at));
    }
    if let Some(at) = request.rejected_at {
        println!("Rejected:   {}", format_date(at));
    }
}

/// Friendly failure report: raw error to the log, plain English to the admin.
fn report(err: &AnteroomError) {
    let friendly = humanize_error(err);
    match friendly.severity {
        Severity::Transient => debug!(error = %err, "transient failure"),
        Severity::ActionRequired => info!(error = %err, "command refused"),
        Severity::Permanent => warn!(error = %err, "permanent failure"),
    }
    println!("{}", friendly.message);
    println!("  {}", friendly.suggestion);
}

fn format_date(at: DateTime<Utc>) -> String {
    at.format("%d %b %Y").to_string()
}

fn print_banner(services: &AppServices) {
    let contact = &services.config().contact;
    println!("Anteroom vendor portal");
    println!("{} | {}", contact.phone, contact.email);
    println!("{}", contact.address);
    println!("Type `help` for commands.");
    println!();
}

fn print_help() {
    println!("Commands:");
    println!("  login                 sign in as the administrator");
    println!("  logout                end the admin session");
    println!("  status                session, lockout, and storage summary");
    println!("  list [pending|approved|rejected|all]");
    println!("                        list signup requests (admin)");
    println!("  show <id>             full details of one request (admin)");
    println!("  approve <id>          approve a request (admin)");
    println!("  reject <id>           reject a request (admin)");
    println!("  remove <id>           delete a request permanently (admin)");
    println!("  submit                file a vendor signup request");
    println!("  quit                  exit");
}
