// Command Dispatcher
//
// Routes an operation name to its handler. Names are parsed into closed
// enumerations first, so an unknown name is rejected before any handler
// or ledger call runs.

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use crate::error::RecordError;
use crate::records;
use crate::schema;
use crate::storage::Ledger;

/// Successful result of an operation. `None` means success with no payload.
pub type Payload = Option<Vec<u8>>;

/// Identifier attached to every dispatched call for log correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InvocationId(pub Uuid);

impl InvocationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for InvocationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InvocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Which entry point a call arrived through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationClass {
    Init,
    Invoke,
    Query,
}

/// Operations accepted on the mutating surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvokeOperation {
    Init,
    Write,
    NewEmp,
}

impl InvokeOperation {
    pub const ALL: [InvokeOperation; 3] = [
        InvokeOperation::Init,
        InvokeOperation::Write,
        InvokeOperation::NewEmp,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            InvokeOperation::Init => "init",
            InvokeOperation::Write => "write",
            InvokeOperation::NewEmp => "new_emp",
        }
    }
}

impl FromStr for InvokeOperation {
    type Err = RecordError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.name() == name)
            .ok_or_else(|| RecordError::UnknownOperation {
                surface: "invocation",
                name: name.to_string(),
            })
    }
}

/// Operations accepted on the read-only surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOperation {
    GetEmpById,
}

impl QueryOperation {
    pub const ALL: [QueryOperation; 1] = [QueryOperation::GetEmpById];

    pub fn name(&self) -> &'static str {
        match self {
            QueryOperation::GetEmpById => "get_emp_by_id",
        }
    }
}

impl FromStr for QueryOperation {
    type Err = RecordError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.name() == name)
            .ok_or_else(|| RecordError::UnknownOperation {
                surface: "query",
                name: name.to_string(),
            })
    }
}

/// Initialization entry: create the employee table named by `args[0]`.
pub fn init<L: Ledger + ?Sized>(ledger: &mut L, args: &[String]) -> Result<Payload, RecordError> {
    let span = tracing::info_span!("init", txid = %InvocationId::new());
    let _enter = span.enter();

    tracing::debug!(?args, "init is running");
    schema::initialize(ledger, args)?;
    Ok(None)
}

/// Mutating entry.
pub fn invoke<L: Ledger + ?Sized>(
    ledger: &mut L,
    name: &str,
    args: &[String],
) -> Result<Payload, RecordError> {
    let span = tracing::info_span!("invoke", txid = %InvocationId::new(), function = name);
    let _enter = span.enter();

    let operation = name.parse::<InvokeOperation>().map_err(|err| {
        tracing::warn!("invoke did not find function");
        err
    })?;
    tracing::debug!(?operation, "invoke is running");

    match operation {
        InvokeOperation::Init => schema::initialize(ledger, args)?,
        InvokeOperation::Write => records::write(ledger, args)?,
        InvokeOperation::NewEmp => records::create_employee(ledger, args)?,
    }
    Ok(None)
}

/// Read-only entry. `get_emp_by_id` uses `args[0]` and ignores the rest.
pub fn query<L: Ledger + ?Sized>(
    ledger: &L,
    name: &str,
    args: &[String],
) -> Result<Payload, RecordError> {
    let span = tracing::info_span!("query", txid = %InvocationId::new(), function = name);
    let _enter = span.enter();

    let operation = name.parse::<QueryOperation>().map_err(|err| {
        tracing::warn!("query did not find function");
        err
    })?;
    tracing::debug!(?operation, "query is running");

    match operation {
        QueryOperation::GetEmpById => {
            let emp_id = args.first().ok_or(RecordError::InvalidArgumentCount {
                expected: 1,
                actual: 0,
            })?;
            records::get_employee_by_id(ledger, emp_id).map(Some)
        }
    }
}

/// Route a call by its class.
///
/// The operation name is ignored for `Init`, as the initialization entry
/// has a single behavior.
pub fn dispatch<L: Ledger + ?Sized>(
    ledger: &mut L,
    class: OperationClass,
    name: &str,
    args: &[String],
) -> Result<Payload, RecordError> {
    match class {
        OperationClass::Init => init(ledger, args),
        OperationClass::Invoke => invoke(ledger, name, args),
        OperationClass::Query => query(ledger, name, args),
    }
}
