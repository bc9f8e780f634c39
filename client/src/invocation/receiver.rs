use cohort_shared::{InvocationError, ProcedureCode, Value};

/// Client half of a notification module: decodes and handles notifications
/// the server pushes for one module name
pub trait InvocationReceiver: Send {
    fn receive(&mut self, code: ProcedureCode, args: Vec<Value>) -> Result<(), InvocationError>;
}
