//! In-memory queries over a snapshot of employee records.
//!
//! # Design Decisions
//! - Pure functions: the caller fetches a fresh snapshot first
//! - Single linear passes; nothing is indexed
//! - Top-k keeps a bounded min-heap, O(n log k)

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::employee::model::Employee;

/// Records whose name contains `fragment`, ignoring case, in input order.
///
/// An empty fragment matches every record.
pub fn search_by_name(employees: Vec<Employee>, fragment: &str) -> Vec<Employee> {
    let needle = fragment.to_lowercase();
    employees
        .into_iter()
        .filter(|e| e.name.to_lowercase().contains(&needle))
        .collect()
}

/// Highest salary in the snapshot, or 0 when it is empty.
pub fn max_salary(employees: &[Employee]) -> i64 {
    employees.iter().map(|e| e.salary).max().unwrap_or(0)
}

/// Names of the `k` best-paid employees, highest salary first.
///
/// Equal salaries keep their first-seen order.
pub fn top_k_earners(employees: &[Employee], k: usize) -> Vec<String> {
    if k == 0 {
        return Vec::new();
    }

    // Heap top is the weakest entry: lowest salary, latest index among ties.
    let mut heap: BinaryHeap<Reverse<(i64, Reverse<usize>)>> = BinaryHeap::with_capacity(k + 1);

    for (idx, employee) in employees.iter().enumerate() {
        let entry = Reverse((employee.salary, Reverse(idx)));
        if heap.len() < k {
            heap.push(entry);
        } else if let Some(Reverse((weakest, _))) = heap.peek() {
            // A later index never beats an equal salary already kept.
            if employee.salary > *weakest {
                heap.pop();
                heap.push(entry);
            }
        }
    }

    let mut kept: Vec<(i64, usize)> = heap
        .into_iter()
        .map(|Reverse((salary, Reverse(idx)))| (salary, idx))
        .collect();
    kept.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

    kept.into_iter()
        .map(|(_, idx)| employees[idx].name.clone())
        .collect()
}
