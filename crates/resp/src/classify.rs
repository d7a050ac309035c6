//! Classification of server error replies by code and message.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::types::ErrorValue;

/// Known families of server errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServerErrorKind {
	/// Generic error reply
	Response,
	/// The server refuses the connection; must abort the session
	Connection,
	Authentication,
	AuthenticationWrongNumberOfArgs,
	ExecAbort,
	BusyLoading,
	NoScript,
	ReadOnly,
	NoPermission,
}

impl ServerErrorKind {
	pub fn is_connection_fatal(self) -> bool {
		matches!(self, ServerErrorKind::Connection)
	}

	pub fn name(self) -> &'static str {
		match self {
			ServerErrorKind::Response => "ResponseError",
			ServerErrorKind::Connection => "ConnectionError",
			ServerErrorKind::Authentication => "AuthenticationError",
			ServerErrorKind::AuthenticationWrongNumberOfArgs => {
				"AuthenticationWrongNumberOfArgsError"
			}
			ServerErrorKind::ExecAbort => "ExecAbortError",
			ServerErrorKind::BusyLoading => "BusyLoadingError",
			ServerErrorKind::NoScript => "NoScriptError",
			ServerErrorKind::ReadOnly => "ReadOnlyError",
			ServerErrorKind::NoPermission => "NoPermissionError",
		}
	}
}

enum ErrorClass {
	Kind(ServerErrorKind),
	/// Codes shared by several kinds, told apart by the exact message
	ByMessage(HashMap<&'static str, ServerErrorKind>),
}

static ERROR_CLASSES: LazyLock<HashMap<&'static str, ErrorClass>> = LazyLock::new(|| {
	let err_messages = HashMap::from([
		("max number of clients reached", ServerErrorKind::Connection),
		(
			"Client sent AUTH, but no password is set",
			ServerErrorKind::Authentication,
		),
		("invalid password", ServerErrorKind::Authentication),
		(
			"wrong number of arguments for 'auth' command",
			ServerErrorKind::AuthenticationWrongNumberOfArgs,
		),
	]);

	HashMap::from([
		("ERR", ErrorClass::ByMessage(err_messages)),
		("EXECABORT", ErrorClass::Kind(ServerErrorKind::ExecAbort)),
		("LOADING", ErrorClass::Kind(ServerErrorKind::BusyLoading)),
		("NOSCRIPT", ErrorClass::Kind(ServerErrorKind::NoScript)),
		("READONLY", ErrorClass::Kind(ServerErrorKind::ReadOnly)),
		("NOAUTH", ErrorClass::Kind(ServerErrorKind::Authentication)),
		("NOPERM", ErrorClass::Kind(ServerErrorKind::NoPermission)),
	])
});

/// Split an error line on its first space and look the code up.
///
/// Unknown codes, and messages missing from a code's message table, fall
/// back to [`ServerErrorKind::Response`].
pub fn classify(text: &str) -> ErrorValue {
	let (code, message) = text.split_once(' ').unwrap_or((text, ""));

	let kind = match ERROR_CLASSES.get(code) {
		Some(ErrorClass::Kind(kind)) => *kind,
		Some(ErrorClass::ByMessage(by_message)) => by_message
			.get(message)
			.copied()
			.unwrap_or(ServerErrorKind::Response),
		None => ServerErrorKind::Response,
	};

	ErrorValue::new(code, message, kind)
}
