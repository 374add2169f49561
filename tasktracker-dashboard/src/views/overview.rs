/// Overview screen: aggregate counts and the status chart
///
/// Fetches all projects and tasks, shows both totals, and renders a
/// categorical bar chart of status frequencies across tasks. When there
/// is nothing to chart an explicit no-data line is printed instead of an
/// empty chart.

use crate::client::{ApiClient, Task};
use crate::views::print_error;
use tasktracker_shared::models::task::TaskStatus;

/// Widest bar in the status chart, in characters
const CHART_WIDTH: usize = 30;

/// Fetches state and renders the overview
pub async fn show(client: &ApiClient) {
    let projects = match client.list_projects().await {
        Ok(projects) => projects,
        Err(e) => {
            print_error("load projects for the overview", &e);
            return;
        }
    };

    let tasks = match client.list_tasks().await {
        Ok(tasks) => tasks,
        Err(e) => {
            print_error("load tasks for the overview", &e);
            return;
        }
    };

    print!("{}", render_overview(projects.len(), &tasks));
}

/// Renders the overview: totals plus the status chart or a no-data line
pub fn render_overview(project_count: usize, tasks: &[Task]) -> String {
    let mut out = String::new();

    out.push_str("== Dashboard ==\n");
    out.push_str(&format!("Total Projects: {}\n", project_count));
    out.push_str(&format!("Total Tasks:    {}\n", tasks.len()));
    out.push('\n');

    if tasks.is_empty() {
        out.push_str("No tasks to display.\n");
        return out;
    }

    let counts = status_counts(tasks);
    if counts.is_empty() {
        out.push_str("No task statuses available.\n");
        return out;
    }

    out.push_str("Tasks by status:\n");
    out.push_str(&render_status_chart(&counts));

    out
}

/// Counts tasks per status, in workflow order, skipping absent statuses
pub fn status_counts(tasks: &[Task]) -> Vec<(TaskStatus, usize)> {
    TaskStatus::ALL
        .iter()
        .filter_map(|status| {
            let count = tasks.iter().filter(|t| t.status == *status).count();
            (count > 0).then_some((*status, count))
        })
        .collect()
}

/// Renders one bar per status value present, scaled to the largest count
pub fn render_status_chart(counts: &[(TaskStatus, usize)]) -> String {
    let max_count = counts.iter().map(|(_, c)| *c).max().unwrap_or(1);
    let label_width = counts
        .iter()
        .map(|(s, _)| s.as_str().len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for (status, count) in counts {
        let bar_len = (count * CHART_WIDTH).div_ceil(max_count);
        out.push_str(&format!(
            "  {:<width$}  {} {}\n",
            status.as_str(),
            "█".repeat(bar_len),
            count,
            width = label_width
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tasktracker_shared::models::task::TaskPriority;
    use uuid::Uuid;

    fn task_with_status(status: TaskStatus) -> Task {
        Task {
            id: Uuid::new_v4(),
            title: "t".to_string(),
            description: None,
            status,
            priority: TaskPriority::Medium,
            assigned_to: None,
            project: Uuid::new_v4(),
            due_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_overview_no_tasks_shows_no_data_message() {
        let rendered = render_overview(2, &[]);
        assert!(rendered.contains("Total Projects: 2"));
        assert!(rendered.contains("Total Tasks:    0"));
        assert!(rendered.contains("No tasks to display."));
        assert!(!rendered.contains("█"));
    }

    #[test]
    fn test_status_counts_skips_absent_statuses() {
        let tasks = vec![
            task_with_status(TaskStatus::Todo),
            task_with_status(TaskStatus::Todo),
            task_with_status(TaskStatus::Done),
        ];

        let counts = status_counts(&tasks);
        assert_eq!(
            counts,
            vec![(TaskStatus::Todo, 2), (TaskStatus::Done, 1)]
        );
    }

    #[test]
    fn test_chart_renders_one_bar_per_status_present() {
        let tasks = vec![
            task_with_status(TaskStatus::Todo),
            task_with_status(TaskStatus::InProgress),
            task_with_status(TaskStatus::InProgress),
        ];

        let chart = render_status_chart(&status_counts(&tasks));
        assert!(chart.contains("todo"));
        assert!(chart.contains("in_progress"));
        assert!(!chart.contains("done"));

        // The largest count gets the full-width bar
        let in_progress_line = chart
            .lines()
            .find(|l| l.contains("in_progress"))
            .unwrap();
        assert!(in_progress_line.contains(&"█".repeat(30)));
    }
}
