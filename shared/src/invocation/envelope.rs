//! Invocation traffic rides on ordinary message events. A request is a
//! message named [`REQUEST_NAME`] posted to the server's invocation object;
//! responses and notifications are messages posted to the caller's client
//! object. The argument layouts are fixed:
//!
//! | message | arguments |
//! |---|---|
//! | request | `[module, procedure code, invocation id, args...]` |
//! | response | `[response name, invocation id, result args...]` |
//! | notification | `[module, procedure code, args...]` |

use crate::{
    invocation::{codes::ProcedureCode, error::InvocationError, id_generator::InvocationId},
    ArgReader, Event, Oid, Value,
};

pub const REQUEST_NAME: &str = "invreq";
pub const RESPONSE_NAME: &str = "invrsp";
pub const NOTIFICATION_NAME: &str = "invnot";

/// Response name for a successful call
pub const REQUEST_PROCESSED: &str = "requestProcessed";
/// Response name for a failed call, args are `[reason code, detail]`
pub const REQUEST_FAILED: &str = "requestFailed";

#[derive(Debug, Clone, PartialEq)]
pub struct InvocationRequest {
    pub module: String,
    pub code: ProcedureCode,
    pub id: InvocationId,
    pub args: Vec<Value>,
}

impl InvocationRequest {
    pub fn to_event(&self, invocation_oid: Oid) -> Event {
        let mut args = Vec::with_capacity(self.args.len() + 3);
        args.push(Value::String(self.module.clone()));
        args.push(code_value(self.code));
        args.push(id_value(self.id));
        args.extend(self.args.iter().cloned());
        Event::message(invocation_oid, REQUEST_NAME, args)
    }

    pub fn from_args(args: Vec<Value>) -> Result<Self, InvocationError> {
        let mut args = args.into_iter();
        let mut header = ArgReader::new(args.by_ref().take(3).collect());
        let module: String = header.read()?;
        let code = read_code(&mut header)?;
        let id = read_id(&mut header)?;
        Ok(Self {
            module,
            code,
            id,
            args: args.collect(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvocationResponse {
    pub name: String,
    pub id: InvocationId,
    pub args: Vec<Value>,
}

impl InvocationResponse {
    pub fn processed(id: InvocationId, args: Vec<Value>) -> Self {
        Self {
            name: REQUEST_PROCESSED.to_string(),
            id,
            args,
        }
    }

    /// A successful response under a provider-chosen name, letting the
    /// caller tell outcomes apart
    pub fn named(id: InvocationId, name: &str, args: Vec<Value>) -> Self {
        Self {
            name: name.to_string(),
            id,
            args,
        }
    }

    pub fn failed(id: InvocationId, error: &InvocationError) -> Self {
        Self {
            name: REQUEST_FAILED.to_string(),
            id,
            args: vec![
                Value::String(error.code().to_string()),
                Value::String(error.detail().to_string()),
            ],
        }
    }

    pub fn to_event(&self, client_oid: Oid) -> Event {
        let mut args = Vec::with_capacity(self.args.len() + 2);
        args.push(Value::String(self.name.clone()));
        args.push(id_value(self.id));
        args.extend(self.args.iter().cloned());
        Event::message(client_oid, RESPONSE_NAME, args)
    }

    pub fn from_args(args: Vec<Value>) -> Result<Self, InvocationError> {
        let mut args = args.into_iter();
        let mut header = ArgReader::new(args.by_ref().take(2).collect());
        let name: String = header.read()?;
        let id = read_id(&mut header)?;
        Ok(Self {
            name,
            id,
            args: args.collect(),
        })
    }

    /// Interprets the response: the response name and result args on
    /// success, the reported error on failure. Any name other than
    /// [`REQUEST_FAILED`] is a successful outcome.
    pub fn into_outcome(self) -> Result<(String, Vec<Value>), InvocationError> {
        match self.name.as_str() {
            REQUEST_FAILED => {
                let mut reader = ArgReader::new(self.args);
                let code: String = reader.read()?;
                let detail: String = reader.read()?;
                Err(InvocationError::from_code(&code, detail))
            }
            "" => Err(InvocationError::Decode("empty response name".to_string())),
            _ => Ok((self.name, self.args)),
        }
    }

    /// Like [`InvocationResponse::into_outcome`], dropping the response name
    pub fn into_result(self) -> Result<Vec<Value>, InvocationError> {
        self.into_outcome().map(|(_, args)| args)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvocationNotification {
    pub module: String,
    pub code: ProcedureCode,
    pub args: Vec<Value>,
}

impl InvocationNotification {
    pub fn to_event(&self, client_oid: Oid) -> Event {
        let mut args = Vec::with_capacity(self.args.len() + 2);
        args.push(Value::String(self.module.clone()));
        args.push(code_value(self.code));
        args.extend(self.args.iter().cloned());
        Event::message(client_oid, NOTIFICATION_NAME, args)
    }

    pub fn from_args(args: Vec<Value>) -> Result<Self, InvocationError> {
        let mut args = args.into_iter();
        let mut header = ArgReader::new(args.by_ref().take(2).collect());
        let module: String = header.read()?;
        let code = read_code(&mut header)?;
        Ok(Self {
            module,
            code,
            args: args.collect(),
        })
    }
}

// Codes and ids travel as signed integers, the widths the envelope has
// always used

fn code_value(code: ProcedureCode) -> Value {
    Value::Int(i32::from(code.to_u16()))
}

fn id_value(id: InvocationId) -> Value {
    Value::Long(i64::from(id.to_u32()))
}

fn read_code(reader: &mut ArgReader) -> Result<ProcedureCode, InvocationError> {
    let raw: i32 = reader.read()?;
    u16::try_from(raw)
        .map(ProcedureCode::from_u16)
        .map_err(|_| InvocationError::Decode(format!("procedure code {} out of range", raw)))
}

fn read_id(reader: &mut ArgReader) -> Result<InvocationId, InvocationError> {
    let raw: i64 = reader.read()?;
    u32::try_from(raw)
        .map(InvocationId::from_u32)
        .map_err(|_| InvocationError::Decode(format!("invocation id {} out of range", raw)))
}
