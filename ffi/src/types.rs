//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! tagged enums with explicit discriminants. Conversion functions live here
//! to keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::{c_void, CString};
use std::os::raw::c_char;

use todo_client::error::ApiError;
use todo_client::http::HttpMethod;
use serde_json::Value;
use todo_client::{ThemePreference, Todo};

/// Opaque handle to a `TodoClient`. C callers receive a pointer to this
/// and pass it back into every `todo_build_*` / `todo_parse_*` function.
pub struct FfiTodoClient {
    pub(crate) inner: todo_client::TodoClient,
}

/// Opaque handle to a `ThemePreference`.
pub struct FfiThemePreference {
    pub(crate) inner: ThemePreference,
}

/// Called with the new flag value and the `user_data` given at subscribe time.
pub type FfiThemeCallback = extern "C" fn(is_dark: bool, user_data: *mut c_void);

/// Move `s` onto the C heap. Interior NULs cannot be represented and are
/// dropped.
pub(crate) fn c_string(s: String) -> *mut c_char {
    let s = if s.contains('\0') { s.replace('\0', "") } else { s };
    CString::new(s).unwrap_or_default().into_raw()
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// Built by `todo_build_*` functions. The C caller executes the request
/// and passes the response back through `todo_parse_*`. `body` is null for
/// bodiless requests.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub path: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: todo_client::HttpRequest) -> *mut Self {
        let path = c_string(req.path);
        let body = match req.body {
            Some(b) => c_string(b),
            None => std::ptr::null_mut(),
        };

        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: c_string(k),
                    value: c_string(v),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            path,
            headers,
            headers_len,
            body,
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller constructs this on the stack after executing an HTTP request,
/// then passes a pointer to a `todo_parse_*` function. The FFI layer reads
/// but does not free these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiTodoResult`.
#[repr(C)]
pub enum FfiErrorCode {
    Ok = 0,
    Http = 1,
    Transport = 2,
    Deserialization = 3,
    Serialization = 4,
    Panic = 5,
    NullArg = 6,
}

/// Tag that tells `todo_free_result` what `FfiTodoResult::data` points to.
#[repr(C)]
pub enum FfiDataTag {
    None = 0,
    Todo = 1,
    TodoList = 2,
    /// `data` is a NUL-terminated JSON document (`char*`).
    Json = 3,
}

/// A single todo item exposed to C.
#[repr(C)]
pub struct FfiTodo {
    pub id: *mut c_char,
    pub value: *mut c_char,
    pub is_completed: bool,
}

impl FfiTodo {
    fn from_core(todo: Todo) -> Self {
        FfiTodo {
            id: c_string(todo.id.to_string()),
            value: c_string(todo.value),
            is_completed: todo.is_completed,
        }
    }
}

/// A list of todo items exposed to C.
#[repr(C)]
pub struct FfiTodoList {
    pub items: *mut FfiTodo,
    pub len: u32,
}

/// Result envelope for all parse operations.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `data`
/// points to the parsed payload (tagged by `data_tag`).
/// On failure `error_code` describes the category, `error_message` is a
/// human-readable C string, and `data` is null. `http_status` is set only
/// for `Http` errors.
#[repr(C)]
pub struct FfiTodoResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub data_tag: FfiDataTag,
    pub data: *mut c_void,
}

impl FfiTodoResult {
    fn ok(data_tag: FfiDataTag, data: *mut c_void) -> *mut Self {
        Box::into_raw(Box::new(FfiTodoResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            http_status: 0,
            data_tag,
            data,
        }))
    }

    fn err(error_code: FfiErrorCode, http_status: u16, msg: String) -> *mut Self {
        Box::into_raw(Box::new(FfiTodoResult {
            error_code,
            error_message: c_string(msg),
            http_status,
            data_tag: FfiDataTag::None,
            data: std::ptr::null_mut(),
        }))
    }

    /// Build a success result carrying a single `FfiTodo`.
    pub(crate) fn ok_todo(todo: Todo) -> *mut Self {
        let ffi_todo = Box::new(FfiTodo::from_core(todo));
        Self::ok(FfiDataTag::Todo, Box::into_raw(ffi_todo) as *mut c_void)
    }

    /// Build a success result carrying a `FfiTodoList`.
    pub(crate) fn ok_todo_list(todos: Vec<Todo>) -> *mut Self {
        let len = todos.len() as u32;
        let items = if todos.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_todos: Box<[FfiTodo]> = todos.into_iter().map(FfiTodo::from_core).collect();
            Box::into_raw(ffi_todos) as *mut FfiTodo
        };

        let ffi_list = Box::new(FfiTodoList { items, len });
        Self::ok(FfiDataTag::TodoList, Box::into_raw(ffi_list) as *mut c_void)
    }

    /// Build a success result carrying the server's raw JSON answer.
    pub(crate) fn ok_json(value: Value) -> *mut Self {
        Self::ok(FfiDataTag::Json, c_string(value.to_string()) as *mut c_void)
    }

    /// Build an error result from an `ApiError`.
    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let msg = err.to_string();
        match err {
            ApiError::Http { status, .. } => Self::err(FfiErrorCode::Http, status, msg),
            ApiError::Transport(_) => Self::err(FfiErrorCode::Transport, 0, msg),
            ApiError::Deserialization(_) => Self::err(FfiErrorCode::Deserialization, 0, msg),
            ApiError::Serialization(_) => Self::err(FfiErrorCode::Serialization, 0, msg),
        }
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::err(FfiErrorCode::NullArg, 0, format!("null argument: {name}"))
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::err(FfiErrorCode::Panic, 0, msg.to_string())
    }
}
