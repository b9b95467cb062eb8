// ABOUTME: Placeholder substitution module for taskflow
// ABOUTME: Resolves ${variable} and ${task.output} references in task fields

pub mod resolver;

pub use resolver::VariableResolver;
