use log::{error, info, warn};

/// Severity of a message that was reported to the [Context].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Diagnostic channel of a calculation. Every message is forwarded to the `log` facade and
/// kept in the context, so that a caller can inspect what happened during a run.
#[derive(Debug, Default, Clone)]
pub struct Context {
    messages: Vec<(Severity, String)>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message<S: Into<String>>(&mut self, msg: S) {
        let msg: String = msg.into();
        info!("{}", msg);
        self.messages.push((Severity::Info, msg));
    }

    pub fn warning<S: Into<String>>(&mut self, msg: S) {
        let msg: String = msg.into();
        warn!("{}", msg);
        self.messages.push((Severity::Warning, msg));
    }

    pub fn error<S: Into<String>>(&mut self, msg: S) {
        let msg: String = msg.into();
        error!("{}", msg);
        self.messages.push((Severity::Error, msg));
    }

    pub fn messages(&self) -> &[(Severity, String)] {
        &self.messages
    }

    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(|(sev, _)| *sev == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &str> {
        self.messages
            .iter()
            .filter(|(sev, _)| *sev == Severity::Warning)
            .map(|(_, msg)| msg.as_str())
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}
