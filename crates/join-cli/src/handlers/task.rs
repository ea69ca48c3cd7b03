use chrono::{Local, NaiveDate};
use join_board::TaskForm;
use join_domain::{
    FieldUpdate, GroupedTasks, StatusFilter, Subtask, TaskPatch, TaskPriority, TaskStatus,
};

use crate::cli::{TaskAction, TaskAddArgs, TaskUpdateArgs};
use crate::context::CliContext;
use crate::output;

pub async fn handle(ctx: &mut CliContext, action: TaskAction) -> anyhow::Result<()> {
    match action {
        TaskAction::Add(args) => {
            let status = match &args.status {
                Some(s) => parse_status(s).map_err(|e| anyhow::anyhow!(e))?,
                None => configured_default_status(),
            };
            let form = build_form(&args).map_err(|e| anyhow::anyhow!(e))?;
            let today = Local::now().date_naive();
            let id = ctx
                .coordinator
                .create_task_from_form(status, form, today)
                .await?;
            ctx.refresh().await?;
            match ctx.find_task(&id) {
                Some(task) => output::output_success(task),
                None => output::output_success(serde_json::json!({ "id": id })),
            }
        }
        TaskAction::List(args) => {
            if let Some(s) = &args.status {
                let status = parse_status(s).map_err(|e| anyhow::anyhow!(e))?;
                ctx.coordinator.set_status_filter(StatusFilter::Only(status));
            }
            if let Some(term) = &args.search {
                ctx.coordinator.set_search_term(term.clone());
            }
            output::output_success(ctx.coordinator.visible_tasks());
        }
        TaskAction::Get { id } => match ctx.find_task(&id) {
            Some(task) => output::output_success(task),
            None => output::output_error(&format!("Task not found: {}", id)),
        },
        TaskAction::Update(args) => {
            let patch = build_patch(&args).map_err(|e| anyhow::anyhow!(e))?;
            if patch.is_empty() {
                output::output_error("No fields to update");
            }
            ctx.coordinator.update_task(&args.id, patch).await?;
            ctx.refresh().await?;
            match ctx.find_task(&args.id) {
                Some(task) => output::output_success(task),
                None => output::output_error(&format!("Task not found: {}", args.id)),
            }
        }
        TaskAction::Move { id, to, position } => {
            let to_column = parse_status(&to).map_err(|e| anyhow::anyhow!(e))?;
            let (from_column, from_index) =
                locate(ctx.coordinator.board(), &id).map_err(|e| anyhow::anyhow!(e))?;
            // Append when no index is given; the coordinator clamps.
            let to_index = position.unwrap_or(usize::MAX);
            ctx.coordinator
                .move_between_columns(from_column, to_column, from_index, to_index)
                .await?;
            ctx.refresh().await?;
            match ctx.find_task(&id) {
                Some(task) => output::output_success(task),
                None => output::output_error(&format!("Task not found: {}", id)),
            }
        }
        TaskAction::SetStatus { id, status } => {
            let status = parse_status(&status).map_err(|e| anyhow::anyhow!(e))?;
            ctx.coordinator.set_status(&id, status).await?;
            ctx.refresh().await?;
            match ctx.find_task(&id) {
                Some(task) => output::output_success(task),
                None => output::output_error(&format!("Task not found: {}", id)),
            }
        }
        TaskAction::Delete { id } => {
            if ctx.find_task(&id).is_none() {
                output::output_error(&format!("Task not found: {}", id));
            }
            ctx.coordinator.delete_task(&id).await?;
            output::output_success(serde_json::json!({ "deleted": id }));
        }
    }
    Ok(())
}

fn build_form(args: &TaskAddArgs) -> Result<TaskForm, String> {
    let priority = match &args.priority {
        Some(p) => Some(parse_priority(p)?),
        None => None,
    };
    Ok(TaskForm {
        title: args.title.clone(),
        description: args.description.clone().unwrap_or_default(),
        due_date: Some(parse_date(&args.due_date)?),
        priority,
        category: args.category.clone(),
        assigned_to: args.assigned.clone(),
        subtasks: args.subtasks.iter().map(|s| Subtask::new(s.as_str())).collect(),
    })
}

fn build_patch(args: &TaskUpdateArgs) -> Result<TaskPatch, String> {
    // Blank required fields never reach the store; absent flags mean
    // "leave unchanged", so only provided values get checked.
    let title = match &args.title {
        Some(t) if t.trim().is_empty() => return Err("Title cannot be empty".to_string()),
        Some(t) => Some(t.trim().to_string()),
        None => None,
    };
    let category = match &args.category {
        Some(c) if c.trim().is_empty() => return Err("Category cannot be empty".to_string()),
        Some(c) => Some(c.trim().to_string()),
        None => None,
    };
    let priority = match &args.priority {
        Some(p) => Some(parse_priority(p)?),
        None => None,
    };
    let due_date = match &args.due_date {
        Some(d) => Some(parse_date(d)?),
        None => None,
    };
    Ok(TaskPatch {
        title,
        description: if args.clear_description {
            FieldUpdate::Clear
        } else {
            args.description
                .clone()
                .map(FieldUpdate::Set)
                .unwrap_or(FieldUpdate::NoChange)
        },
        due_date,
        priority,
        category,
        assigned_to: args.assigned.clone(),
        ..TaskPatch::default()
    })
}

/// Column for new tasks when neither the command line nor the config file
/// picks one.
fn configured_default_status() -> TaskStatus {
    join_core::AppConfig::load()
        .default_status
        .as_deref()
        .and_then(|s| parse_status(s).ok())
        .unwrap_or(TaskStatus::Todo)
}

fn locate(board: &GroupedTasks, id: &str) -> Result<(TaskStatus, usize), String> {
    for status in TaskStatus::ORDER {
        if let Some(index) = board.column(status).iter().position(|t| t.id == id) {
            return Ok((status, index));
        }
    }
    Err(format!("Task not found: {}", id))
}

fn parse_status(s: &str) -> Result<TaskStatus, String> {
    match s.to_lowercase().replace(['-', '_'], "").as_str() {
        "todo" => Ok(TaskStatus::Todo),
        "inprogress" => Ok(TaskStatus::InProgress),
        "awaitfeedback" => Ok(TaskStatus::AwaitFeedback),
        "done" => Ok(TaskStatus::Done),
        _ => Err(format!(
            "Invalid status '{}'. Valid values: todo, in-progress, await-feedback, done",
            s
        )),
    }
}

fn parse_priority(s: &str) -> Result<TaskPriority, String> {
    match s.to_lowercase().as_str() {
        "urgent" => Ok(TaskPriority::Urgent),
        "medium" => Ok(TaskPriority::Medium),
        "low" => Ok(TaskPriority::Low),
        _ => Err(format!(
            "Invalid priority '{}'. Valid values: urgent, medium, low",
            s
        )),
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{}'. Expected format: YYYY-MM-DD", s))
}
