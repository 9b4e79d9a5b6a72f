//! Command dispatch: one store operation per invocation, then render.

use crate::render;
use crate::{
    CategoryCommand, Commands, SettingsCommand, StatusArg, TaskAddArgs, TaskCommand,
    TaskEditArgs, TaskListArgs,
};
use chrono::Local;
use std::error::Error;
use taskdeck_core::{
    available_colors, AppState, Category, CategoryDraft, CategoryPatch, KeyValueRepository,
    SettingsPatch, Task, TaskFilter, TaskForm,
};
use uuid::Uuid;

pub type CliResult<T> = Result<T, Box<dyn Error>>;

pub fn dispatch<R: KeyValueRepository + Clone>(
    state: &mut AppState<R>,
    command: Commands,
    json: bool,
) -> CliResult<()> {
    match command {
        Commands::Task { command } => run_task(state, command, json),
        Commands::Category { command } => run_category(state, command, json),
        Commands::Stats => {
            let stats = state.tasks().stats();
            if json {
                render::print_json(&stats)
            } else {
                render::print_stats(&stats);
                Ok(())
            }
        }
        Commands::Dashboard => {
            let summary = state.dashboard();
            if json {
                render::print_json(&summary)
            } else {
                render::print_dashboard(&summary, state.categories());
                Ok(())
            }
        }
        Commands::Settings { command } => {
            let settings = match command {
                SettingsCommand::Show => state.settings().clone(),
                SettingsCommand::Set {
                    theme,
                    default_view,
                    notifications,
                } => state.update_settings(SettingsPatch {
                    theme: theme.map(Into::into),
                    default_view: default_view.map(Into::into),
                    notifications,
                }),
            };
            if json {
                render::print_json(&settings)
            } else {
                render::print_settings(&settings);
                Ok(())
            }
        }
    }
}

fn run_task<R: KeyValueRepository + Clone>(
    state: &mut AppState<R>,
    command: TaskCommand,
    json: bool,
) -> CliResult<()> {
    match command {
        TaskCommand::Add(args) => {
            let task = add_task(state, args)?;
            print_task(state, &task, json)
        }
        TaskCommand::Edit(args) => {
            let task = edit_task(state, args)?;
            print_task(state, &task, json)
        }
        TaskCommand::Done { id } => {
            let task = state
                .toggle_task_completion(id)
                .ok_or_else(|| task_not_found(id))?;
            print_task(state, &task, json)
        }
        TaskCommand::Delete { id } => {
            if !state.delete_task(id) {
                return Err(task_not_found(id));
            }
            println!("deleted task {id}");
            Ok(())
        }
        TaskCommand::Show { id } => {
            let task = state.tasks().get(id).ok_or_else(|| task_not_found(id))?;
            print_task(state, task, json)
        }
        TaskCommand::List(args) => list_tasks(state, args, json),
    }
}

fn add_task<R: KeyValueRepository + Clone>(
    state: &mut AppState<R>,
    args: TaskAddArgs,
) -> CliResult<Task> {
    let form = TaskForm {
        title: args.title,
        description: args.description,
        priority: args.priority.into(),
        due_date: args.due,
        category_id: args.category,
    };
    let draft = form.into_draft(Local::now().date_naive())?;
    Ok(state.create_task(draft)?)
}

fn edit_task<R: KeyValueRepository + Clone>(
    state: &mut AppState<R>,
    args: TaskEditArgs,
) -> CliResult<Task> {
    let existing = state
        .tasks()
        .get(args.id)
        .ok_or_else(|| task_not_found(args.id))?;
    let mut form = TaskForm::from_task(existing);
    if let Some(title) = args.title {
        form.title = title;
    }
    if let Some(description) = args.description {
        form.description = description;
    }
    if let Some(priority) = args.priority {
        form.priority = priority.into();
    }
    if args.clear_due {
        form.due_date = None;
    } else if let Some(due) = args.due {
        form.due_date = Some(due);
    }
    if args.clear_category {
        form.category_id = None;
    } else if let Some(category) = args.category {
        form.category_id = Some(category);
    }

    let patch = form.into_patch(Local::now().date_naive())?;
    state
        .update_task(args.id, patch)?
        .ok_or_else(|| task_not_found(args.id))
}

fn list_tasks<R: KeyValueRepository + Clone>(
    state: &AppState<R>,
    args: TaskListArgs,
    json: bool,
) -> CliResult<()> {
    let tasks = state.tasks();
    let by_status: Vec<&Task> = match args.status {
        StatusArg::All => tasks.tasks().iter().collect(),
        StatusArg::Pending => tasks.by_completion(false),
        StatusArg::Completed => tasks.by_completion(true),
        StatusArg::Overdue => tasks.overdue(),
        StatusArg::Today => tasks.due_today(),
        StatusArg::Soon => tasks.due_soon(),
    };
    let filter = TaskFilter {
        query: args.query,
        category_id: args.category,
        priority: args.priority.map(Into::into),
    };
    let selected: Vec<&Task> = by_status
        .into_iter()
        .filter(|task| filter.matches(task))
        .collect();

    if json {
        return render::print_json(&selected);
    }
    if selected.is_empty() {
        println!("no tasks");
    }
    for task in selected {
        println!("{}", render::task_line(task, state.categories()));
    }
    Ok(())
}

fn run_category<R: KeyValueRepository + Clone>(
    state: &mut AppState<R>,
    command: CategoryCommand,
    json: bool,
) -> CliResult<()> {
    match command {
        CategoryCommand::Add { name, color } => {
            let category = state.create_category(CategoryDraft { name, color })?;
            print_category(state, &category, json)
        }
        CategoryCommand::Edit { id, name, color } => {
            let category = state
                .update_category(id, CategoryPatch { name, color })?
                .ok_or_else(|| category_not_found(id))?;
            print_category(state, &category, json)
        }
        CategoryCommand::Delete { id } => {
            let removal = state.delete_category(id);
            if json && removal.changed() {
                return render::print_json(&serde_json::json!({
                    "categoryId": id,
                    "removed": removal.removed,
                    "detachedTasks": removal.detached_tasks,
                }));
            }
            match (removal.removed, removal.detached_tasks) {
                (true, detached) => {
                    println!("deleted category {id}; detached {detached} task(s)");
                }
                (false, 0) => return Err(category_not_found(id)),
                (false, detached) => {
                    println!("category {id} not found; detached {detached} dangling task(s)");
                }
            }
            Ok(())
        }
        CategoryCommand::List => {
            let categories = state.categories().categories();
            if json {
                return render::print_json(categories);
            }
            for category in categories {
                let count = state.tasks().by_category(category.id).len();
                println!("{}", render::category_line(category, count));
            }
            Ok(())
        }
        CategoryCommand::Colors => {
            for color in available_colors() {
                println!("{color}");
            }
            Ok(())
        }
    }
}

fn print_task<R: KeyValueRepository + Clone>(
    state: &AppState<R>,
    task: &Task,
    json: bool,
) -> CliResult<()> {
    if json {
        render::print_json(task)
    } else {
        println!("{}", render::task_line(task, state.categories()));
        Ok(())
    }
}

fn print_category<R: KeyValueRepository + Clone>(
    state: &AppState<R>,
    category: &Category,
    json: bool,
) -> CliResult<()> {
    if json {
        render::print_json(category)
    } else {
        let count = state.tasks().by_category(category.id).len();
        println!("{}", render::category_line(category, count));
        Ok(())
    }
}

fn task_not_found(id: Uuid) -> Box<dyn Error> {
    format!("task not found: {id}").into()
}

fn category_not_found(id: Uuid) -> Box<dyn Error> {
    format!("category not found: {id}").into()
}
