/// Tasks screen: create form, tabular summary, per-task detail
///
/// The create form requires a title and a project picked from the fetched
/// project list; when that fetch fails the selector is empty and creation
/// is blocked with a clear message. The table shows title, status,
/// priority, assigned_to and project, with the assigned_to column only
/// present when at least one task carries a value.

use crate::client::{ApiClient, NewTask, Project, Task};
use crate::views::{confirm_retry, print_error, prompt_with_default, read_line};
use chrono::NaiveDate;
use std::collections::HashMap;
use tasktracker_shared::models::task::{TaskPriority, TaskStatus};
use uuid::Uuid;

/// Runs the tasks view loop
pub async fn show(client: &ApiClient) {
    loop {
        // The project list drives the create selector and detail display;
        // its failure must not take the task list down with it.
        let projects = client.list_projects().await;

        let tasks = match client.list_tasks().await {
            Ok(tasks) => tasks,
            Err(e) => {
                print_error("fetch tasks", &e);
                return;
            }
        };

        print!("{}", render_task_table(&tasks));

        let choice = match read_line("[c]reate  [v]iew  [d]elete  [Enter] back: ") {
            Ok(Some(choice)) => choice,
            _ => return,
        };

        match choice.as_str() {
            "c" => match &projects {
                Ok(available) => {
                    if create_task_flow(client, available).await.is_none() {
                        return;
                    }
                }
                Err(e) => {
                    print_error("load the project selector", e);
                    println!("Task creation is blocked until projects can be loaded.");
                }
            },
            "v" => {
                let names = project_names(projects.as_deref().unwrap_or(&[]));
                if view_detail_flow(client, &tasks, &names).await.is_none() {
                    return;
                }
            }
            "d" => {
                if delete_task_flow(client, &tasks).await.is_none() {
                    return;
                }
            }
            "" => return,
            other => println!("Unknown choice: {}", other),
        }
    }
}

fn project_names(projects: &[Project]) -> HashMap<Uuid, String> {
    projects
        .iter()
        .map(|p| (p.id, p.name.clone()))
        .collect()
}

/// Renders the tabular task summary
///
/// The assigned_to column appears only when the data carries it.
pub fn render_task_table(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No tasks found.\n".to_string();
    }

    let show_assignee = tasks.iter().any(|t| t.assigned_to.is_some());

    let mut header = vec!["#", "title", "status", "priority"];
    if show_assignee {
        header.push("assigned_to");
    }
    header.push("project");

    let rows: Vec<Vec<String>> = tasks
        .iter()
        .enumerate()
        .map(|(i, task)| {
            let mut row = vec![
                (i + 1).to_string(),
                truncate(&task.title, 32),
                task.status.to_string(),
                task.priority.to_string(),
            ];
            if show_assignee {
                row.push(task.assigned_to.clone().unwrap_or_else(|| "-".to_string()));
            }
            row.push(short_id(&task.project));
            row
        })
        .collect();

    format_table(&header, &rows)
}

/// Renders the expanded per-task detail view
pub fn render_task_detail(task: &Task, project_name: Option<&str>) -> String {
    let mut out = String::new();

    out.push_str(&format!("== {} ==\n", task.title));
    out.push_str(&format!("Status:      {}\n", task.status));
    out.push_str(&format!("Priority:    {}\n", task.priority));
    out.push_str(&format!(
        "Description: {}\n",
        task.description.as_deref().unwrap_or("No description")
    ));
    match project_name {
        Some(name) => out.push_str(&format!("Project:     {} ({})\n", name, task.project)),
        None => out.push_str(&format!("Project:     {}\n", task.project)),
    }
    out.push_str(&format!(
        "Assigned to: {}\n",
        task.assigned_to.as_deref().unwrap_or("Unassigned")
    ));
    out.push_str(&format!(
        "Due date:    {}\n",
        task.due_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "Not set".to_string())
    ));
    out.push_str(&format!("Created:     {}\n", task.created_at.format("%Y-%m-%d %H:%M:%S")));
    out.push_str(&format!("Updated:     {}\n", task.updated_at.format("%Y-%m-%d %H:%M:%S")));
    out.push_str(&format!("Id:          {}\n", task.id));

    out
}

/// Parses an optional status answer; empty input defers to the server default
pub fn parse_status(input: &str) -> Result<Option<TaskStatus>, String> {
    match input {
        "" => Ok(None),
        "todo" => Ok(Some(TaskStatus::Todo)),
        "in_progress" => Ok(Some(TaskStatus::InProgress)),
        "done" => Ok(Some(TaskStatus::Done)),
        other => Err(format!(
            "Unknown status '{}' (expected todo, in_progress or done)",
            other
        )),
    }
}

/// Parses an optional priority answer; empty input defers to the server default
pub fn parse_priority(input: &str) -> Result<Option<TaskPriority>, String> {
    match input {
        "" => Ok(None),
        "low" => Ok(Some(TaskPriority::Low)),
        "medium" => Ok(Some(TaskPriority::Medium)),
        "high" => Ok(Some(TaskPriority::High)),
        other => Err(format!(
            "Unknown priority '{}' (expected low, medium or high)",
            other
        )),
    }
}

/// Parses an optional ISO-8601 due date
pub fn parse_due_date(input: &str) -> Result<Option<NaiveDate>, String> {
    if input.is_empty() {
        return Ok(None);
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| format!("Not a valid date '{}' (expected YYYY-MM-DD)", input))
}

/// Interactive create form
///
/// Form values persist across failed submissions so they can be corrected
/// and retried. Returns None when stdin is closed.
async fn create_task_flow(client: &ApiClient, projects: &[Project]) -> Option<()> {
    if projects.is_empty() {
        println!("No projects exist yet. Create a project first; a task cannot be created without one.");
        return Some(());
    }

    println!("Select a project:");
    for (i, project) in projects.iter().enumerate() {
        println!("  {}. {}", i + 1, project.name);
    }

    let mut title = String::new();
    let mut description = String::new();
    let mut status_input = String::new();
    let mut priority_input = String::new();
    let mut assignee = String::new();
    let mut due_input = String::new();
    let mut project_choice = String::new();

    loop {
        project_choice = prompt_with_default("Project number", &project_choice).ok()??;
        let project = match project_choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| projects.get(i))
        {
            Some(project) => project,
            None => {
                println!("Pick a number between 1 and {}.", projects.len());
                project_choice.clear();
                continue;
            }
        };

        title = prompt_with_default("Task title", &title).ok()??;
        if title.is_empty() {
            println!("Task title is required.");
            continue;
        }

        description = prompt_with_default("Description", &description).ok()??;

        status_input = prompt_with_default("Status (todo/in_progress/done)", &status_input).ok()??;
        let status = match parse_status(&status_input) {
            Ok(status) => status,
            Err(msg) => {
                println!("{}", msg);
                status_input.clear();
                continue;
            }
        };

        priority_input = prompt_with_default("Priority (low/medium/high)", &priority_input).ok()??;
        let priority = match parse_priority(&priority_input) {
            Ok(priority) => priority,
            Err(msg) => {
                println!("{}", msg);
                priority_input.clear();
                continue;
            }
        };

        assignee = prompt_with_default("Assignee username", &assignee).ok()??;

        due_input = prompt_with_default("Due date (YYYY-MM-DD)", &due_input).ok()??;
        let due_date = match parse_due_date(&due_input) {
            Ok(due_date) => due_date,
            Err(msg) => {
                println!("{}", msg);
                due_input.clear();
                continue;
            }
        };

        let payload = NewTask {
            title: title.clone(),
            description: (!description.is_empty()).then(|| description.clone()),
            status,
            priority,
            project: project.id,
            assigned_to: (!assignee.is_empty()).then(|| assignee.clone()),
            due_date,
        };

        match client.create_task(&payload).await {
            Ok(task) => {
                println!("✓ Task '{}' created.", task.title);
                return Some(());
            }
            Err(e) => {
                print_error("create task", &e);
                if !confirm_retry().ok()? {
                    return Some(());
                }
                // Loop again with the entered values as defaults
            }
        }
    }
}

/// Shows the detail view for a picked task, with a delete action.
/// Returns None when stdin is closed.
async fn view_detail_flow(
    client: &ApiClient,
    tasks: &[Task],
    project_names: &HashMap<Uuid, String>,
) -> Option<()> {
    let Some(task) = pick_task(tasks)? else {
        return Some(());
    };

    let name = project_names.get(&task.project).map(String::as_str);
    print!("{}", render_task_detail(task, name));

    let choice = read_line("[d]elete this task  [Enter] back: ").ok()??;
    if choice == "d" {
        match client.delete_task(task.id).await {
            Ok(()) => println!("✓ Task deleted."),
            Err(e) => print_error("delete task", &e),
        }
    }

    Some(())
}

/// Deletes a picked task. Returns None when stdin is closed.
async fn delete_task_flow(client: &ApiClient, tasks: &[Task]) -> Option<()> {
    let Some(task) = pick_task(tasks)? else {
        return Some(());
    };

    match client.delete_task(task.id).await {
        Ok(()) => println!("✓ Task deleted."),
        Err(e) => print_error("delete task", &e),
    }

    Some(())
}

/// Asks for a row number from the rendered table
///
/// Outer None = stdin closed, inner None = no valid pick.
fn pick_task<'t>(tasks: &'t [Task]) -> Option<Option<&'t Task>> {
    if tasks.is_empty() {
        println!("No tasks to pick from.");
        return Some(None);
    }

    let answer = read_line("Task number: ").ok()??;
    let picked = answer
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| tasks.get(i));

    if picked.is_none() && !answer.is_empty() {
        println!("Pick a number between 1 and {}.", tasks.len());
    }

    Some(picked)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }

    let mut truncated: String = s.chars().take(max.saturating_sub(1)).collect();
    truncated.push('…');
    truncated
}

fn short_id(id: &Uuid) -> String {
    id.to_string().chars().take(8).collect()
}

fn format_table(header: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();

    for (i, h) in header.iter().enumerate() {
        out.push_str(&format!("{:<width$}  ", h, width = widths[i]));
    }
    out.push('\n');

    for (i, _) in header.iter().enumerate() {
        out.push_str(&"-".repeat(widths[i]));
        out.push_str("  ");
    }
    out.push('\n');

    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            out.push_str(&format!("{:<width$}  ", cell, width = widths[i]));
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn task(title: &str, assigned_to: Option<&str>) -> Task {
        Task {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: None,
            status: TaskStatus::Todo,
            priority: TaskPriority::Medium,
            assigned_to: assigned_to.map(String::from),
            project: Uuid::new_v4(),
            due_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_table_message() {
        assert_eq!(render_task_table(&[]), "No tasks found.\n");
    }

    #[test]
    fn test_assignee_column_only_when_present_in_data() {
        let unassigned = vec![task("Write spec", None), task("Ship it", None)];
        let rendered = render_task_table(&unassigned);
        assert!(!rendered.contains("assigned_to"));

        let mixed = vec![task("Write spec", Some("alice")), task("Ship it", None)];
        let rendered = render_task_table(&mixed);
        assert!(rendered.contains("assigned_to"));
        assert!(rendered.contains("alice"));
        // Unassigned rows render a placeholder
        assert!(rendered.contains(" - "));
    }

    #[test]
    fn test_table_always_has_core_columns() {
        let rendered = render_task_table(&[task("Write spec", None)]);
        for column in ["title", "status", "priority", "project"] {
            assert!(rendered.contains(column), "missing column {}", column);
        }
        assert!(rendered.contains("todo"));
        assert!(rendered.contains("medium"));
    }

    #[test]
    fn test_detail_view_fields() {
        let t = task("Write spec", Some("alice"));
        let rendered = render_task_detail(&t, Some("Launch"));
        assert!(rendered.contains("== Write spec =="));
        assert!(rendered.contains("Launch"));
        assert!(rendered.contains("alice"));
        assert!(rendered.contains("Not set"));

        let rendered = render_task_detail(&task("Bare", None), None);
        assert!(rendered.contains("Unassigned"));
        assert!(rendered.contains("No description"));
    }

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status(""), Ok(None));
        assert_eq!(parse_status("todo"), Ok(Some(TaskStatus::Todo)));
        assert_eq!(parse_status("in_progress"), Ok(Some(TaskStatus::InProgress)));
        assert!(parse_status("archived").is_err());
    }

    #[test]
    fn test_parse_priority() {
        assert_eq!(parse_priority(""), Ok(None));
        assert_eq!(parse_priority("high"), Ok(Some(TaskPriority::High)));
        assert!(parse_priority("urgent").is_err());
    }

    #[test]
    fn test_parse_due_date() {
        assert_eq!(parse_due_date(""), Ok(None));
        assert_eq!(
            parse_due_date("2025-08-01"),
            Ok(NaiveDate::from_ymd_opt(2025, 8, 1))
        );
        assert!(parse_due_date("08/01/2025").is_err());
    }

    #[test]
    fn test_truncate_long_titles() {
        assert_eq!(truncate("short", 32), "short");
        let long = "x".repeat(40);
        let truncated = truncate(&long, 32);
        assert_eq!(truncated.chars().count(), 32);
        assert!(truncated.ends_with('…'));
    }
}
