//! Employee operations composed from the upstream adapter and the query engine.

use std::sync::Arc;

use crate::employee::error::{EmployeeError, EmployeeResult};
use crate::employee::model::{Employee, NewEmployee};
use crate::employee::query;
use crate::upstream::EmployeeUpstream;

/// Number of names returned by [`EmployeeService::top_earners`].
pub const TOP_EARNERS_LIMIT: usize = 10;

/// Answers each employee operation with live upstream data.
#[derive(Clone)]
pub struct EmployeeService {
    upstream: Arc<dyn EmployeeUpstream>,
}

impl EmployeeService {
    pub fn new(upstream: Arc<dyn EmployeeUpstream>) -> Self {
        Self { upstream }
    }

    pub async fn list_all(&self) -> EmployeeResult<Vec<Employee>> {
        self.upstream.list_all().await
    }

    pub async fn search(&self, fragment: &str) -> EmployeeResult<Vec<Employee>> {
        let employees = self.upstream.list_all().await?;
        Ok(query::search_by_name(employees, fragment))
    }

    pub async fn get(&self, id: &str) -> EmployeeResult<Employee> {
        self.upstream.get_by_id(id).await
    }

    pub async fn max_salary(&self) -> EmployeeResult<i64> {
        let employees = self.upstream.list_all().await?;
        Ok(query::max_salary(&employees))
    }

    pub async fn top_earners(&self) -> EmployeeResult<Vec<String>> {
        let employees = self.upstream.list_all().await?;
        Ok(query::top_k_earners(&employees, TOP_EARNERS_LIMIT))
    }

    /// Create an employee from validated input.
    pub async fn create(&self, input: &NewEmployee) -> EmployeeResult<Employee> {
        let employee = self.upstream.create(input).await?;
        tracing::info!(id = %employee.id, name = %employee.name, "Employee created");
        Ok(employee)
    }

    /// Delete the employee with `id`, returning the name that was deleted.
    ///
    /// Resolves the name first, then deletes by name. The two calls are not
    /// atomic: a rename or removal in between is not detected.
    pub async fn delete(&self, id: &str) -> EmployeeResult<String> {
        let employee = self.upstream.get_by_id(id).await?;

        if !self.upstream.delete_by_name(&employee.name).await? {
            tracing::warn!(id, name = %employee.name, "Upstream did not confirm deletion");
            return Err(EmployeeError::NotFound(id.to_string()));
        }

        tracing::info!(id, name = %employee.name, "Employee deleted");
        Ok(employee.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// In-memory upstream that counts calls.
    #[derive(Default)]
    struct FakeUpstream {
        employees: Mutex<Vec<Employee>>,
        list_calls: AtomicUsize,
        delete_calls: AtomicUsize,
        unavailable: bool,
    }

    impl FakeUpstream {
        fn with(employees: Vec<Employee>) -> Self {
            Self {
                employees: Mutex::new(employees),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl EmployeeUpstream for FakeUpstream {
        async fn list_all(&self) -> EmployeeResult<Vec<Employee>> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            if self.unavailable {
                return Err(EmployeeError::UpstreamUnavailable("connection refused".into()));
            }
            Ok(self.employees.lock().unwrap().clone())
        }

        async fn get_by_id(&self, id: &str) -> EmployeeResult<Employee> {
            self.employees
                .lock()
                .unwrap()
                .iter()
                .find(|e| e.id == id)
                .cloned()
                .ok_or_else(|| EmployeeError::NotFound(id.to_string()))
        }

        async fn create(&self, input: &NewEmployee) -> EmployeeResult<Employee> {
            let mut employees = self.employees.lock().unwrap();
            let employee = Employee {
                id: format!("id-{}", employees.len() + 1),
                name: input.name.clone(),
                salary: input.salary,
                age: input.age,
                title: input.title.clone(),
                email: Some("new@company.com".into()),
            };
            employees.push(employee.clone());
            Ok(employee)
        }

        async fn delete_by_name(&self, name: &str) -> EmployeeResult<bool> {
            self.delete_calls.fetch_add(1, Ordering::SeqCst);
            let mut employees = self.employees.lock().unwrap();
            let before = employees.len();
            employees.retain(|e| e.name != name);
            Ok(employees.len() < before)
        }
    }

    fn employee(id: &str, name: &str, salary: i64) -> Employee {
        Employee {
            id: id.into(),
            name: name.into(),
            salary,
            age: 40,
            title: "Analyst".into(),
            email: None,
        }
    }

    fn service(fake: Arc<FakeUpstream>) -> EmployeeService {
        EmployeeService::new(fake)
    }

    #[tokio::test]
    async fn test_search_uses_fresh_list() {
        let fake = Arc::new(FakeUpstream::with(vec![
            employee("1", "Alice", 90_000),
            employee("2", "Bob", 50_000),
            employee("3", "alice B", 70_000),
        ]));
        let svc = service(fake.clone());

        let found = svc.search("alice").await.unwrap();
        let names: Vec<_> = found.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "alice B"]);

        svc.search("bob").await.unwrap();
        assert_eq!(fake.list_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_max_salary_and_top_earners() {
        let fake = Arc::new(FakeUpstream::with(vec![
            employee("1", "a", 100),
            employee("2", "b", 200),
            employee("3", "c", 150),
        ]));
        let svc = service(fake);
        assert_eq!(svc.max_salary().await.unwrap(), 200);
        assert_eq!(svc.top_earners().await.unwrap(), vec!["b", "c", "a"]);
    }

    #[tokio::test]
    async fn test_top_earners_capped_at_ten() {
        let staff = (0..15)
            .map(|i| employee(&i.to_string(), &format!("e{i}"), 1000 + i))
            .collect();
        let svc = service(Arc::new(FakeUpstream::with(staff)));
        let top = svc.top_earners().await.unwrap();
        assert_eq!(top.len(), TOP_EARNERS_LIMIT);
        assert_eq!(top[0], "e14");
        assert_eq!(top[9], "e5");
    }

    #[tokio::test]
    async fn test_empty_upstream() {
        let svc = service(Arc::new(FakeUpstream::default()));
        assert_eq!(svc.max_salary().await.unwrap(), 0);
        assert!(svc.top_earners().await.unwrap().is_empty());
        assert!(svc.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_all_idempotent() {
        let svc = service(Arc::new(FakeUpstream::with(vec![
            employee("1", "a", 1),
            employee("2", "b", 2),
        ])));
        assert_eq!(svc.list_all().await.unwrap(), svc.list_all().await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_resolves_name() {
        let fake = Arc::new(FakeUpstream::with(vec![
            employee("1", "Alice", 1),
            employee("2", "Bob", 2),
        ]));
        let svc = service(fake.clone());

        assert_eq!(svc.delete("2").await.unwrap(), "Bob");
        assert_eq!(fake.delete_calls.load(Ordering::SeqCst), 1);
        assert!(matches!(svc.get("2").await, Err(EmployeeError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_id_never_deletes() {
        let fake = Arc::new(FakeUpstream::with(vec![employee("1", "Alice", 1)]));
        let svc = service(fake.clone());

        let err = svc.delete("nope").await.unwrap_err();
        assert!(matches!(err, EmployeeError::NotFound(ref id) if id == "nope"));
        assert_eq!(fake.delete_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failures_pass_through() {
        let fake = Arc::new(FakeUpstream {
            unavailable: true,
            ..Default::default()
        });
        let svc = service(fake);
        assert!(matches!(
            svc.search("x").await,
            Err(EmployeeError::UpstreamUnavailable(_))
        ));
        assert!(matches!(
            svc.max_salary().await,
            Err(EmployeeError::UpstreamUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_create_returns_upstream_record() {
        let svc = service(Arc::new(FakeUpstream::default()));
        let input = NewEmployee {
            name: "New Hire".into(),
            salary: 60_000,
            age: 22,
            title: "Intern".into(),
        };
        let created = svc.create(&input).await.unwrap();
        assert_eq!(created.name, "New Hire");
        assert_eq!(created.email.as_deref(), Some("new@company.com"));
        assert!(!created.id.is_empty());
    }
}
