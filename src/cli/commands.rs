// ABOUTME: Command implementations for the taskflow CLI
// ABOUTME: Handles execution of the run and validate commands

use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::config::Config;
use crate::engine::{validate_workflow as plan_workflow, ExecutionPlan, WorkflowEngine};
use crate::output::OutputHandler;
use crate::parser::{Workflow, WorkflowParser};
use crate::tasks::TaskRegistry;

/// Everything `taskflow run` needs beyond the loaded configuration.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub workflow: PathBuf,
    pub variables: HashMap<String, String>,
    pub dry_run: bool,
    pub output: Option<PathBuf>,
    pub max_concurrent: usize,
}

async fn load_workflow(path: &Path) -> Result<Workflow> {
    WorkflowParser::new()
        .parse_file(path)
        .await
        .map_err(|e| anyhow!("Failed to parse workflow: {}", e))
}

/// Variable precedence: configuration defaults, then the workflow, then the command line
fn effective_variables(
    config: &Config,
    workflow: &Workflow,
    overrides: &HashMap<String, String>,
) -> HashMap<String, String> {
    let mut variables = config.variables.clone();
    variables.extend(workflow.variables.clone());
    variables.extend(overrides.clone());
    variables
}

fn print_plan(plan: &ExecutionPlan) {
    for (index, round) in plan.rounds.iter().enumerate() {
        println!("Round {}:", index + 1);
        if !round.parallel.is_empty() {
            println!("  parallel:   {}", round.parallel.join(", "));
        }
        if !round.sequential.is_empty() {
            println!("  sequential: {}", round.sequential.join(", "));
        }
    }
}

/// Execute a workflow command
pub async fn run_workflow(
    options: RunOptions,
    config: &Config,
    cancel: CancellationToken,
) -> Result<()> {
    println!("📋 Loading workflow from: {}", options.workflow.display());
    let mut workflow = load_workflow(&options.workflow).await?;
    workflow.variables = effective_variables(config, &workflow, &options.variables);

    println!("📝 Workflow: {}", workflow.name);
    if let Some(description) = workflow.description.as_deref().filter(|d| !d.is_empty()) {
        println!("   {}", description);
    }
    println!("   Tasks: {}\n", workflow.tasks.len());

    if options.dry_run {
        let plan = plan_workflow(&workflow)
            .map_err(|e| anyhow!("Workflow validation failed: {}", e))?;
        print_plan(&plan);
        info!("Dry run - no tasks executed");
        return Ok(());
    }

    let engine = WorkflowEngine::new().with_max_concurrent(options.max_concurrent);

    println!("🚀 Starting workflow execution...\n");
    let (workflow_result, run_error) = match engine.run(&workflow, cancel).await {
        Ok(result) => (result, None),
        Err(failure) => (failure.partial, Some(failure.error)),
    };

    let output = OutputHandler::new();
    println!();
    output.print_summary(&workflow_result).await?;

    if let Some(path) = &options.output {
        output.write_report(&workflow_result, path).await?;
        info!("Results written to: {}", path.display());
    }

    if let Some(error) = run_error {
        return Err(anyhow!("⚠️  Workflow completed with errors: {}", error));
    }

    if workflow_result.has_failures() {
        return Err(anyhow!(
            "{} task(s) failed",
            workflow_result.summary.failed_tasks
        ));
    }

    println!("\n✨ Workflow completed successfully!");
    Ok(())
}

/// Validate a workflow file
pub async fn validate_workflow(workflow_path: PathBuf) -> Result<()> {
    info!("Validating workflow: {}", workflow_path.display());

    let workflow = load_workflow(&workflow_path)
        .await
        .map_err(|e| anyhow!("Workflow validation failed: {}", e))?;

    let plan =
        plan_workflow(&workflow).map_err(|e| anyhow!("Workflow validation failed: {}", e))?;

    let registry = TaskRegistry::new();
    let supported = registry.list_supported_tasks();
    for task in &workflow.tasks {
        if !supported.contains(&task.task_type.as_str()) {
            warn!("Task '{}' has unknown type '{}'", task.name, task.task_type);
            println!(
                "⚠ Task '{}' has unknown type '{}' and will fail when run",
                task.name, task.task_type
            );
        }
    }

    println!("✓ Workflow '{}' is valid", workflow.name);
    println!("  Tasks: {}", workflow.tasks.len());
    println!("  Variables: {}", workflow.variables.len());
    println!("  Rounds: {}", plan.execution_depth());
    println!("  Max parallel: {}", plan.max_parallelism());

    info!("Workflow validation completed successfully");

    Ok(())
}
