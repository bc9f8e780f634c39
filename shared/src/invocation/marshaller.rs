use std::collections::HashMap;

use crate::{
    invocation::{
        codes::ProcedureCode,
        envelope::{InvocationNotification, InvocationRequest},
        error::{InvocationError, RegistrationError},
        id_generator::InvocationId,
    },
    Value,
};

/// The procedure table of one module, shared by the caller side (to encode
/// requests) and the dispatching side (to name incoming codes in logs and
/// errors). Built once at startup.
#[derive(Debug, Clone)]
pub struct Marshaller {
    module: String,
    procedures: HashMap<ProcedureCode, String>,
}

impl Marshaller {
    pub fn new(module: &str, procedures: &[&str]) -> Result<Self, RegistrationError> {
        let mut table: HashMap<ProcedureCode, String> = HashMap::new();
        for name in procedures {
            let code = ProcedureCode::of(name);
            if let Some(existing) = table.get(&code) {
                if existing == name {
                    return Err(RegistrationError::DuplicateProcedure {
                        module: module.to_string(),
                        name: name.to_string(),
                    });
                }
                return Err(RegistrationError::CodeCollision {
                    module: module.to_string(),
                    first: existing.clone(),
                    second: name.to_string(),
                    code,
                });
            }
            table.insert(code, name.to_string());
        }
        Ok(Self {
            module: module.to_string(),
            procedures: table,
        })
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn code(&self, procedure: &str) -> Option<ProcedureCode> {
        let code = ProcedureCode::of(procedure);
        self.procedures.contains_key(&code).then_some(code)
    }

    pub fn procedure(&self, code: ProcedureCode) -> Option<&str> {
        self.procedures.get(&code).map(String::as_str)
    }

    pub fn procedures(&self) -> impl Iterator<Item = (ProcedureCode, &str)> {
        self.procedures
            .iter()
            .map(|(code, name)| (*code, name.as_str()))
    }

    /// `module#procedure` for logs, or `module#code` when the code is unknown
    pub fn describe(&self, code: ProcedureCode) -> String {
        match self.procedure(code) {
            Some(name) => format!("{}#{}", self.module, name),
            None => format!("{}{}", self.module, code),
        }
    }

    pub fn request(
        &self,
        procedure: &str,
        id: InvocationId,
        args: Vec<Value>,
    ) -> Result<InvocationRequest, InvocationError> {
        let code = self.resolve(procedure)?;
        Ok(InvocationRequest {
            module: self.module.clone(),
            code,
            id,
            args,
        })
    }

    pub fn notification(
        &self,
        procedure: &str,
        args: Vec<Value>,
    ) -> Result<InvocationNotification, InvocationError> {
        let code = self.resolve(procedure)?;
        Ok(InvocationNotification {
            module: self.module.clone(),
            code,
            args,
        })
    }

    fn resolve(&self, procedure: &str) -> Result<ProcedureCode, InvocationError> {
        self.code(procedure).ok_or_else(|| {
            InvocationError::UnresolvedTarget(format!("{}#{}", self.module, procedure))
        })
    }
}
