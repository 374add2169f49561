/// Projects screen: create form plus the full project list
///
/// The create form requires a name; description is optional, the owner is
/// left to the server's resolution policy, and members start empty. Each
/// successful create or delete reloads the view before the next paint.

use crate::client::{ApiClient, NewProject, Project};
use crate::views::{confirm_retry, print_error, prompt_with_default, read_line};
use uuid::Uuid;

/// Runs the projects view loop
pub async fn show(client: &ApiClient) {
    loop {
        match client.list_projects().await {
            Ok(projects) => print!("{}", render_project_list(&projects)),
            Err(e) => print_error("fetch projects", &e),
        }

        let choice = match read_line("[c]reate  [d]elete  [Enter] back: ") {
            Ok(Some(choice)) => choice,
            _ => return,
        };

        match choice.as_str() {
            "c" => {
                if create_project_flow(client).await.is_none() {
                    return;
                }
            }
            "d" => {
                if delete_project_flow(client).await.is_none() {
                    return;
                }
            }
            "" => return,
            other => println!("Unknown choice: {}", other),
        }
    }
}

/// Renders the project list: name, owner, description, creation time
pub fn render_project_list(projects: &[Project]) -> String {
    if projects.is_empty() {
        return "No projects found.\n".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!("== Projects ({}) ==\n", projects.len()));

    for project in projects {
        out.push_str(&format!("* {}  (owner: {})\n", project.name, project.owner));
        out.push_str(&format!(
            "    {}\n",
            project.description.as_deref().unwrap_or("No description")
        ));
        if !project.members.is_empty() {
            out.push_str(&format!("    Members: {}\n", project.members.join(", ")));
        }
        out.push_str(&format!(
            "    Created: {}  Id: {}\n",
            project.created_at.format("%Y-%m-%d %H:%M:%S"),
            project.id
        ));
    }

    out
}

/// Interactive create form
///
/// Form values persist across failed submissions so they can be corrected
/// and retried. Returns None when stdin is closed.
async fn create_project_flow(client: &ApiClient) -> Option<()> {
    let mut name = String::new();
    let mut description = String::new();

    loop {
        name = prompt_with_default("Project name", &name).ok()??;
        if name.is_empty() {
            println!("Project name is required.");
            continue;
        }

        description = prompt_with_default("Description", &description).ok()??;

        let payload = NewProject {
            name: name.clone(),
            description: (!description.is_empty()).then(|| description.clone()),
            members: vec![],
        };

        match client.create_project(&payload).await {
            Ok(project) => {
                println!("✓ Project '{}' created.", project.name);
                return Some(());
            }
            Err(e) => {
                print_error("create project", &e);
                if !confirm_retry().ok()? {
                    return Some(());
                }
                // Loop again with the entered values as defaults
            }
        }
    }
}

/// Interactive delete-by-id flow. Returns None when stdin is closed.
async fn delete_project_flow(client: &ApiClient) -> Option<()> {
    let answer = read_line("Project id to delete: ").ok()??;
    if answer.is_empty() {
        return Some(());
    }

    let id = match answer.parse::<Uuid>() {
        Ok(id) => id,
        Err(_) => {
            println!("Not a valid project id: {}", answer);
            return Some(());
        }
    };

    match client.delete_project(id).await {
        Ok(()) => println!("✓ Project deleted."),
        Err(e) => print_error("delete project", &e),
    }

    Some(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn project(name: &str, description: Option<&str>, members: Vec<&str>) -> Project {
        Project {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: description.map(String::from),
            owner: Uuid::new_v4(),
            members: members.into_iter().map(String::from).collect(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_list_message() {
        assert_eq!(render_project_list(&[]), "No projects found.\n");
    }

    #[test]
    fn test_list_shows_name_owner_description_and_created() {
        let p = project("Launch", Some("Q1 launch"), vec!["alice"]);
        let owner = p.owner;

        let rendered = render_project_list(&[p]);
        assert!(rendered.contains("Launch"));
        assert!(rendered.contains(&owner.to_string()));
        assert!(rendered.contains("Q1 launch"));
        assert!(rendered.contains("Members: alice"));
        assert!(rendered.contains("Created: "));
    }

    #[test]
    fn test_list_placeholder_for_missing_description() {
        let rendered = render_project_list(&[project("Bare", None, vec![])]);
        assert!(rendered.contains("No description"));
        assert!(!rendered.contains("Members:"));
    }
}
