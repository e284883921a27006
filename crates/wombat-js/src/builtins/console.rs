//! The `console` global.
//!
//! Messages format their arguments space-separated and go to the
//! interpreter's [`ConsoleSink`](crate::interpreter::ConsoleSink); the
//! browser shell decides whether that surfaces on stderr or a debug
//! panel.

use std::cell::RefCell;
use std::rc::Rc;

use crate::interpreter::ConsoleLevel;
use crate::value::{JsFunction, JsObject, Value};

/// Build the `console` object.
#[must_use]
pub fn make_console() -> Value {
    let console = Rc::new(RefCell::new(JsObject::new()));
    let levels = [
        ("log", ConsoleLevel::Log),
        ("error", ConsoleLevel::Error),
        ("warn", ConsoleLevel::Warn),
        ("info", ConsoleLevel::Info),
        ("debug", ConsoleLevel::Debug),
    ];
    for (name, level) in levels {
        console.borrow_mut().set(
            name,
            JsFunction::native(name, move |interp, _, args| {
                let text = args
                    .iter()
                    .map(Value::to_display_string)
                    .collect::<Vec<_>>()
                    .join(" ");
                interp.console.write(level, text);
                Ok(Value::Undefined)
            }),
        );
    }
    Value::Object(console)
}
