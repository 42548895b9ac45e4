//! Customer mutation actions
//!
//! Single creation is all-or-nothing. Bulk creation folds over the inputs in
//! order, committing each valid record on its own so that one bad record never
//! affects the others.

use std::collections::HashSet;

use tracing::{error, info, warn};

use crate::common::validation::{validate_email, validate_name, validate_phone};
use crate::common::{CrmError, CrmResult, StoreError};
use crate::domains::customers::data::{BulkCreateCustomersPayload, CustomerData, CustomerInput};
use crate::domains::customers::models::{CreateCustomer, Customer};
use crate::kernel::ServerDeps;

pub const CUSTOMER_CREATED_MESSAGE: &str = "Customer created successfully.";

/// Check every field and normalize it the way it will be stored.
pub fn validate_customer(input: CustomerInput) -> CrmResult<CreateCustomer> {
    Ok(CreateCustomer {
        name: validate_name("name", &input.name)?,
        email: validate_email(&input.email)?,
        phone: validate_phone(input.phone.as_deref())?,
    })
}

/// Insert, mapping a lost race on the email constraint to a conflict.
async fn insert_customer(new_customer: CreateCustomer, deps: &ServerDeps) -> CrmResult<Customer> {
    let email = new_customer.email.clone();
    deps.store
        .insert_customer(new_customer)
        .await
        .map_err(|e| match e {
            StoreError::UniqueViolation { .. } => CrmError::email_taken(&email),
            other => CrmError::Store(other),
        })
}

/// Create one customer. Nothing is persisted on failure.
pub async fn create_customer(input: CustomerInput, deps: &ServerDeps) -> CrmResult<Customer> {
    let new_customer = validate_customer(input)?;

    info!(email = %new_customer.email, "Creating customer");

    if deps.store.customer_email_exists(&new_customer.email).await? {
        return Err(CrmError::email_taken(&new_customer.email));
    }

    let customer = insert_customer(new_customer, deps).await?;

    info!(customer_id = %customer.id, "Customer created");

    Ok(customer)
}

/// Validate and persist one bulk record against everything committed so far.
async fn create_bulk_record(
    input: CustomerInput,
    batch_emails: &HashSet<String>,
    deps: &ServerDeps,
) -> CrmResult<Customer> {
    let new_customer = validate_customer(input)?;

    if batch_emails.contains(&new_customer.email)
        || deps.store.customer_email_exists(&new_customer.email).await?
    {
        return Err(CrmError::email_taken(&new_customer.email));
    }

    insert_customer(new_customer, deps).await
}

/// Create many customers with partial success.
///
/// Records are handled strictly in input order. Each failure becomes an entry
/// `"Record <n>: <reason>"` (1-based) and is otherwise skipped; successes are
/// committed immediately and returned in input order.
pub async fn bulk_create_customers(
    inputs: Vec<CustomerInput>,
    deps: &ServerDeps,
) -> BulkCreateCustomersPayload {
    info!(count = inputs.len(), "Bulk creating customers");

    let mut payload = BulkCreateCustomersPayload::default();
    let mut batch_emails = HashSet::new();

    for (index, input) in inputs.into_iter().enumerate() {
        let position = index + 1;
        match create_bulk_record(input, &batch_emails, deps).await {
            Ok(customer) => {
                batch_emails.insert(customer.email.clone());
                payload.customers.push(CustomerData::from(customer));
            }
            Err(e) if e.is_client_error() => {
                warn!(position, error = %e, "Bulk customer record rejected");
                payload.errors.push(format!("Record {}: {}", position, e));
            }
            Err(e) => {
                error!(position, error = %e, "Bulk customer record failed");
                payload
                    .errors
                    .push(format!("Record {}: internal error", position));
            }
        }
    }

    info!(
        created = payload.customers.len(),
        failed = payload.errors.len(),
        "Bulk customer creation finished"
    );

    payload
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::TestDependencies;

    fn input(name: &str, email: &str, phone: Option<&str>) -> CustomerInput {
        CustomerInput {
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn create_customer_trims_and_persists() {
        let test_deps = TestDependencies::new();
        let deps = test_deps.into_server_deps();

        let customer = create_customer(
            input("  Alice ", " alice@example.com ", Some("+1234567890")),
            &deps,
        )
        .await
        .unwrap();

        assert_eq!(customer.name, "Alice");
        assert_eq!(customer.email, "alice@example.com");
        assert_eq!(customer.phone.as_deref(), Some("+1234567890"));
        assert_eq!(test_deps.store.customer_count(), 1);
    }

    #[tokio::test]
    async fn create_customer_rejects_existing_email() {
        let test_deps = TestDependencies::new();
        let deps = test_deps.into_server_deps();
        create_customer(input("Alice", "alice@example.com", None), &deps)
            .await
            .unwrap();

        let err = create_customer(input("Other", "alice@example.com", None), &deps)
            .await
            .unwrap_err();

        assert_eq!(err.code(), "CONFLICT");
        assert_eq!(err.to_string(), "email already exists: alice@example.com");
        assert_eq!(test_deps.store.customer_count(), 1);
    }

    #[tokio::test]
    async fn create_customer_rejects_bad_phone_without_persisting() {
        let test_deps = TestDependencies::new();
        let deps = test_deps.into_server_deps();

        let err = create_customer(input("Alice", "alice@example.com", Some("12345")), &deps)
            .await
            .unwrap_err();

        assert!(matches!(err, CrmError::Validation { field: "phone", .. }));
        assert_eq!(test_deps.store.customer_count(), 0);
    }

    #[tokio::test]
    async fn bulk_reports_intra_batch_duplicate_by_position() {
        let test_deps = TestDependencies::new();
        let deps = test_deps.into_server_deps();

        let payload = bulk_create_customers(
            vec![
                input("Bob", "bob@x.com", Some("123-456-7890")),
                input("Carol", "carol@x.com", None),
                input("Dave", "bob@x.com", None),
            ],
            &deps,
        )
        .await;

        let names: Vec<_> = payload.customers.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Bob", "Carol"]);
        assert_eq!(payload.errors, ["Record 3: email already exists: bob@x.com"]);
        assert_eq!(test_deps.store.customer_count(), 2);
    }

    #[tokio::test]
    async fn bulk_keeps_going_after_invalid_records() {
        let test_deps = TestDependencies::new();
        let deps = test_deps.into_server_deps();
        create_customer(input("Existing", "taken@x.com", None), &deps)
            .await
            .unwrap();

        let payload = bulk_create_customers(
            vec![
                input("", "blank@x.com", None),
                input("Taken", "taken@x.com", None),
                input("Ok", "ok@x.com", None),
                input("Phone", "phone@x.com", Some("12345")),
            ],
            &deps,
        )
        .await;

        assert_eq!(payload.customers.len(), 1);
        assert_eq!(payload.customers[0].email, "ok@x.com");
        assert_eq!(payload.errors.len(), 3);
        assert!(payload.errors[0].starts_with("Record 1: name"));
        assert_eq!(payload.errors[1], "Record 2: email already exists: taken@x.com");
        assert!(payload.errors[2].starts_with("Record 4: invalid phone format"));
    }

    #[tokio::test]
    async fn bulk_hides_store_failures_behind_generic_reason() {
        let test_deps = TestDependencies::new();
        let deps = test_deps.into_server_deps();
        test_deps.store.fail_writes();

        let payload =
            bulk_create_customers(vec![input("Bob", "bob@x.com", None)], &deps).await;

        assert!(payload.customers.is_empty());
        assert_eq!(payload.errors, ["Record 1: internal error"]);
    }
}
