use std::collections::{HashMap, HashSet};

use log::{debug, warn};

use crate::model::Task;

/// Inverse dependency map: prerequisite task id → ordered dependent ids.
///
/// Rebuilt whenever the task set changes. Edges naming an unknown task are
/// skipped. Cycles are tolerated but reported once per rebuild; traversal
/// helpers guard against them with a visited set.
#[derive(Debug, Default)]
pub struct DependencyIndex {
    dependents: HashMap<String, Vec<String>>,
}

impl DependencyIndex {
    pub fn build(tasks: &[Task]) -> Self {
        let known: HashSet<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        let mut dependents: HashMap<String, Vec<String>> = HashMap::new();
        for task in tasks {
            for dep in &task.dependencies {
                if !known.contains(dep.as_str()) {
                    debug!("skipping unresolved dependency {dep:?} of task {:?}", task.id);
                    continue;
                }
                dependents
                    .entry(dep.clone())
                    .or_default()
                    .push(task.id.clone());
            }
        }
        let index = Self { dependents };
        if let Some(cycle) = index.find_cycle() {
            warn!("dependency graph contains a cycle: {}", cycle.join(" -> "));
        }
        index
    }

    /// Tasks that directly depend on `id`.
    pub fn dependents(&self, id: &str) -> &[String] {
        self.dependents.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All tasks reachable from `id` through dependent edges, excluding
    /// `id` itself. Every task appears after the one that reached it.
    /// Safe on cyclic graphs.
    pub fn cascade(&self, id: &str) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::new();
        seen.insert(id);
        let mut queue: Vec<&str> = vec![id];
        let mut out = Vec::new();
        while let Some(current) = queue.pop() {
            for dep in self.dependents(current) {
                if seen.insert(dep) {
                    out.push(dep.clone());
                    queue.push(dep);
                }
            }
        }
        out
    }

    /// First cycle found by depth-first search, if any, as the ids along
    /// the closing path.
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        let mut finished: HashSet<&str> = HashSet::new();
        for root in self.dependents.keys() {
            let mut on_path: Vec<&str> = Vec::new();
            if let Some(cycle) = self.dfs(root, &mut on_path, &mut finished) {
                return Some(cycle);
            }
        }
        None
    }

    fn dfs<'a>(
        &'a self,
        node: &'a str,
        on_path: &mut Vec<&'a str>,
        finished: &mut HashSet<&'a str>,
    ) -> Option<Vec<String>> {
        if finished.contains(node) {
            return None;
        }
        if let Some(pos) = on_path.iter().position(|n| *n == node) {
            let mut cycle: Vec<String> = on_path[pos..].iter().map(|s| s.to_string()).collect();
            cycle.push(node.to_owned());
            return Some(cycle);
        }
        on_path.push(node);
        for dep in self.dependents(node) {
            if let Some(cycle) = self.dfs(dep, on_path, finished) {
                return Some(cycle);
            }
        }
        on_path.pop();
        finished.insert(node);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::{normalize_task, NormalizeContext, TaskInput};

    fn task(id: &str, deps: &[&str]) -> Task {
        let input = TaskInput {
            id: Some(id.to_owned()),
            name: id.to_owned(),
            start: Some("2024-01-01".to_owned()),
            end: Some("2024-01-05".to_owned()),
            dependencies: Some(crate::model::task::DependencyField::List(
                deps.iter().map(|s| s.to_string()).collect(),
            )),
            ..Default::default()
        };
        let ctx = NormalizeContext {
            today: chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            date_format: "%Y-%m-%d",
        };
        normalize_task(&input, "p", ctx).expect("normalize")
    }

    #[test]
    fn index_inverts_dependency_direction() {
        let tasks = vec![task("a", &[]), task("b", &["a"]), task("c", &["a"])];
        let index = DependencyIndex::build(&tasks);
        assert_eq!(index.dependents("a"), ["b", "c"]);
        assert!(index.dependents("b").is_empty());
    }

    #[test]
    fn unresolved_edges_are_skipped() {
        let tasks = vec![task("a", &["ghost"]), task("b", &["a"])];
        let index = DependencyIndex::build(&tasks);
        assert!(index.dependents("ghost").is_empty());
        assert_eq!(index.dependents("a"), ["b"]);
    }

    #[test]
    fn cascade_is_transitive() {
        let tasks = vec![
            task("a", &[]),
            task("b", &["a"]),
            task("c", &["b"]),
            task("d", &["c"]),
        ];
        let index = DependencyIndex::build(&tasks);
        let mut reach = index.cascade("a");
        reach.sort();
        assert_eq!(reach, ["b", "c", "d"]);
    }

    #[test]
    fn cascade_terminates_on_cycles() {
        let tasks = vec![task("a", &["b"]), task("b", &["a"])];
        let index = DependencyIndex::build(&tasks);
        let reach = index.cascade("a");
        assert_eq!(reach, ["b"]);
    }

    #[test]
    fn find_cycle_reports_cyclic_graphs_only() {
        let acyclic = DependencyIndex::build(&[task("a", &[]), task("b", &["a"])]);
        assert!(acyclic.find_cycle().is_none());

        let cyclic =
            DependencyIndex::build(&[task("a", &["c"]), task("b", &["a"]), task("c", &["b"])]);
        let cycle = cyclic.find_cycle().expect("cycle");
        assert!(cycle.len() >= 3);
    }
}
