// ABOUTME: Dependency graph checks and execution planning
// ABOUTME: Reports unknown, self, and circular dependencies before a run and previews its rounds

use petgraph::algo::tarjan_scc;
use petgraph::graph::NodeIndex;
use petgraph::{Direction, Graph};
use std::collections::{HashMap, HashSet};

use crate::parser::{ValidationError, Workflow};

pub struct DependencyGraph {
    graph: Graph<String, ()>,
    task_indices: HashMap<String, NodeIndex>,
    parallel: HashSet<String>,
}

/// Rounds the scheduler would run if every task succeeded.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionPlan {
    pub rounds: Vec<PlannedRound>,
    pub total_tasks: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlannedRound {
    pub parallel: Vec<String>,
    pub sequential: Vec<String>,
}

impl DependencyGraph {
    /// Build the graph, rejecting empty workflows, duplicate names, and
    /// dependencies that are unknown or point at the task itself
    pub fn from_workflow(workflow: &Workflow) -> Result<Self, ValidationError> {
        if workflow.tasks.is_empty() {
            return Err(ValidationError::EmptyWorkflow);
        }

        let mut graph = Graph::new();
        let mut task_indices = HashMap::new();

        // Node indices follow authoring order
        for task in &workflow.tasks {
            if task_indices.contains_key(&task.name) {
                return Err(ValidationError::DuplicateTask {
                    task: task.name.clone(),
                });
            }
            let node = graph.add_node(task.name.clone());
            task_indices.insert(task.name.clone(), node);
        }

        for task in &workflow.tasks {
            let task_node = task_indices[&task.name];
            for dependency in &task.depends_on {
                if dependency == &task.name {
                    return Err(ValidationError::SelfDependency {
                        task: task.name.clone(),
                    });
                }
                let dep_node = task_indices.get(dependency).ok_or_else(|| {
                    ValidationError::UnknownDependency {
                        task: task.name.clone(),
                        dependency: dependency.clone(),
                    }
                })?;
                graph.add_edge(*dep_node, task_node, ());
            }
        }

        let parallel = workflow
            .tasks
            .iter()
            .filter(|t| t.parallel)
            .map(|t| t.name.clone())
            .collect();

        Ok(Self {
            graph,
            task_indices,
            parallel,
        })
    }

    /// Tasks caught in dependency cycles, each cycle in authoring order
    pub fn cycles(&self) -> Vec<Vec<String>> {
        let mut cycles: Vec<Vec<String>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| component.len() > 1)
            .map(|mut component| {
                component.sort();
                component
                    .into_iter()
                    .map(|node| self.graph[node].clone())
                    .collect()
            })
            .collect();
        cycles.sort_by_key(|cycle| self.task_indices[&cycle[0]]);
        cycles
    }

    /// Group tasks into the rounds a fully successful run would execute
    pub fn execution_plan(&self) -> Result<ExecutionPlan, ValidationError> {
        if let Some(cycle) = self.cycles().into_iter().next() {
            return Err(ValidationError::CircularDependency { tasks: cycle });
        }

        let mut done: HashSet<NodeIndex> = HashSet::new();
        let mut rounds = Vec::new();

        while done.len() < self.graph.node_count() {
            let ready: Vec<NodeIndex> = self
                .graph
                .node_indices()
                .filter(|node| !done.contains(node))
                .filter(|node| {
                    self.graph
                        .neighbors_directed(*node, Direction::Incoming)
                        .all(|dep| done.contains(&dep))
                })
                .collect();

            // Acyclic graphs always have a ready node
            if ready.is_empty() {
                break;
            }

            let mut round = PlannedRound::default();
            for node in ready {
                let name = self.graph[node].clone();
                if self.parallel.contains(&name) {
                    round.parallel.push(name);
                } else {
                    round.sequential.push(name);
                }
                done.insert(node);
            }
            rounds.push(round);
        }

        Ok(ExecutionPlan {
            rounds,
            total_tasks: self.graph.node_count(),
        })
    }

}

impl ExecutionPlan {
    /// Size of the largest parallel group
    pub fn max_parallelism(&self) -> usize {
        self.rounds
            .iter()
            .map(|round| round.parallel.len())
            .max()
            .unwrap_or(0)
    }

    pub fn execution_depth(&self) -> usize {
        self.rounds.len()
    }
}

/// Check a workflow's dependency structure and return its round plan
pub fn validate_workflow(workflow: &Workflow) -> Result<ExecutionPlan, ValidationError> {
    DependencyGraph::from_workflow(workflow)?.execution_plan()
}
