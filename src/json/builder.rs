use super::{Error, Value};

enum Frame {
    Array(Vec<Value>),
    Object(Vec<(String, Value)>, Option<String>),
}

/// Chained JSON value constructor enforcing the legal state transitions of
/// the grammar: a `Value` can only land where a key or an array slot expects
/// one, `Key` only inside an object awaiting a key, and `Build` only once
/// exactly one complete value has been assembled.
///
/// Mirrors the original's stack of context objects (`DictItemContext`,
/// `DictValueContext`, `ArrayItemContext`) with a single runtime-checked
/// frame stack rather than a distinct type per call site.
#[derive(Default)]
pub struct Builder {
    stack: Vec<Frame>,
    root: Option<Value>,
    finished: bool,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    fn illegal(&self, what: &'static str) -> Error {
        Error::IncompleteValue(what)
    }

    /// Inserts a complete value wherever the current state expects one.
    pub fn value(&mut self, v: impl Into<Value>) -> Result<&mut Self, Error> {
        if self.finished {
            return Err(self.illegal("value() called after build()"));
        }
        let v = v.into();
        match self.stack.last_mut() {
            None => {
                if self.root.is_some() {
                    return Err(self.illegal("value() called with a root value already set"));
                }
                self.root = Some(v);
            }
            Some(Frame::Array(items)) => items.push(v),
            Some(Frame::Object(entries, pending_key)) => match pending_key.take() {
                Some(k) => entries.push((k, v)),
                None => return Err(self.illegal("value() called while expecting a key")),
            },
        }
        Ok(self)
    }

    pub fn start_dict(&mut self) -> Result<&mut Self, Error> {
        self.check_can_start("start_dict()")?;
        self.stack.push(Frame::Object(Vec::new(), None));
        Ok(self)
    }

    pub fn start_array(&mut self) -> Result<&mut Self, Error> {
        self.check_can_start("start_array()")?;
        self.stack.push(Frame::Array(Vec::new()));
        Ok(self)
    }

    fn check_can_start(&self, what: &'static str) -> Result<(), Error> {
        if self.finished {
            return Err(self.illegal(what));
        }
        match self.stack.last() {
            None if self.root.is_some() => Err(self.illegal(what)),
            None => Ok(()),
            Some(Frame::Array(_)) => Ok(()),
            Some(Frame::Object(_, pending_key)) if pending_key.is_some() => Ok(()),
            Some(Frame::Object(_, _)) => Err(self.illegal(what)),
        }
    }

    pub fn key(&mut self, k: impl Into<String>) -> Result<&mut Self, Error> {
        if self.finished {
            return Err(self.illegal("key()"));
        }
        match self.stack.last_mut() {
            Some(Frame::Object(_, pending_key)) if pending_key.is_none() => {
                *pending_key = Some(k.into());
                Ok(self)
            }
            _ => Err(self.illegal("key() called outside an object awaiting a key")),
        }
    }

    pub fn end_dict(&mut self) -> Result<&mut Self, Error> {
        match self.stack.last() {
            Some(Frame::Object(_, None)) => {}
            _ => return Err(self.illegal("end_dict() called in the wrong state")),
        }
        let Some(Frame::Object(entries, _)) = self.stack.pop() else {
            unreachable!()
        };
        self.value(Value::Object(entries))
    }

    pub fn end_array(&mut self) -> Result<&mut Self, Error> {
        match self.stack.last() {
            Some(Frame::Array(_)) => {}
            _ => return Err(self.illegal("end_array() called in the wrong state")),
        }
        let Some(Frame::Array(items)) = self.stack.pop() else {
            unreachable!()
        };
        self.value(Value::Array(items))
    }

    pub fn build(&mut self) -> Result<Value, Error> {
        if self.finished || !self.stack.is_empty() {
            return Err(self.illegal("build() called before a complete value was assembled"));
        }
        match self.root.take() {
            Some(v) => {
                self.finished = true;
                Ok(v)
            }
            None => Err(self.illegal("build() called with no value assembled")),
        }
    }
}
