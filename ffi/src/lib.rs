//! C-ABI wrapper around `todo-client`.
//!
//! # Overview
//! Exposes the todo API through `extern "C"` functions so any language with
//! a C FFI can build and parse HTTP requests/responses without linking to
//! Rust's HTTP stack or serde directly. The theme preference is exposed as
//! an opaque handle with a C callback for change notification.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Per-operation `build_*` / `parse_*` mirrors the core API 1:1.
//! - A single `FfiTodoResult` envelope with `FfiDataTag` + `void* data`
//!   conveys success payloads and errors uniformly.
//! - The C caller owns all returned pointers and must call the matching
//!   `todo_free_*` function to release them.

pub mod types;

use std::ffi::{c_void, CStr, CString};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use todo_client::http::HttpResponse;
use todo_client::{ColorScheme, SubscriptionId, ThemePreference, TodoId};

use types::*;

/// Borrow a C string as UTF-8. `None` if it is not valid UTF-8.
///
/// # Safety
/// `ptr` must be non-null and point to a NUL-terminated string.
unsafe fn borrow_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    CStr::from_ptr(ptr).to_str().ok()
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a new `TodoClient` bound to `base_url`.
///
/// Returns null if `base_url` is null or not UTF-8, or if an internal panic
/// occurs.
/// The caller must free the returned pointer with `todo_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn todo_client_new(base_url: *const c_char) -> *mut FfiTodoClient {
    catch_unwind(|| {
        if base_url.is_null() {
            return std::ptr::null_mut();
        }
        let Some(url) = (unsafe { borrow_str(base_url) }) else {
            return std::ptr::null_mut();
        };
        let client = todo_client::TodoClient::new(url);
        Box::into_raw(Box::new(FfiTodoClient { inner: client }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a `TodoClient` created by `todo_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn todo_client_free(client: *mut FfiTodoClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

/// Build the `GET /get-todo` request.
///
/// Returns null if `client` is null.
/// The caller must free the returned pointer with `todo_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn todo_build_get_all_todos(client: *const FfiTodoClient) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        FfiHttpRequest::from_core(client.inner.build_get_all_todos())
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build the `POST /add-todo` request. `isCompleted` is always sent false.
///
/// Returns null if `client` or `value` is null, if `value` is not UTF-8, or
/// if serialization fails.
#[unsafe(no_mangle)]
pub extern "C" fn todo_build_add_todo(
    client: *const FfiTodoClient,
    value: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() || value.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let Some(value) = (unsafe { borrow_str(value) }) else {
            return std::ptr::null_mut();
        };
        match client.inner.build_add_todo(value) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build the bodiless `POST /update-todo/{id}` request.
///
/// Returns null if `client` or `id` is null, or if `id` is not UTF-8.
#[unsafe(no_mangle)]
pub extern "C" fn todo_build_update_todo_status(
    client: *const FfiTodoClient,
    id: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() || id.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let Some(id) = (unsafe { borrow_str(id) }) else {
            return std::ptr::null_mut();
        };
        let id = TodoId::new(id);
        FfiHttpRequest::from_core(client.inner.build_update_todo_status(&id))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build the bodiless `POST /del-todo/{id}` request.
///
/// Returns null if `client` or `id` is null, or if `id` is not UTF-8.
#[unsafe(no_mangle)]
pub extern "C" fn todo_build_delete_todo(
    client: *const FfiTodoClient,
    id: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() || id.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let Some(id) = (unsafe { borrow_str(id) }) else {
            return std::ptr::null_mut();
        };
        let id = TodoId::new(id);
        FfiHttpRequest::from_core(client.inner.build_delete_todo(&id))
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Parse response functions
// ---------------------------------------------------------------------------

/// Convert an `FfiHttpResponse` to a core `HttpResponse`. A null body is
/// treated as empty; invalid UTF-8 is replaced, not rejected.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    let body = if resp.body.is_null() {
        String::new()
    } else {
        unsafe { CStr::from_ptr(resp.body) }.to_string_lossy().into_owned()
    };
    HttpResponse {
        status: resp.status,
        headers: Vec::new(),
        body,
    }
}

/// Shared null checks and panic guard for every `todo_parse_*` function.
fn parse_with(
    fn_name: &str,
    client: *const FfiTodoClient,
    response: *const FfiHttpResponse,
    parse: impl FnOnce(&todo_client::TodoClient, HttpResponse) -> *mut FfiTodoResult,
) -> *mut FfiTodoResult {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return FfiTodoResult::null_arg("client");
        }
        if response.is_null() {
            return FfiTodoResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        parse(&client.inner, ffi_response_to_core(resp))
    }))
    .unwrap_or_else(|_| FfiTodoResult::panic(&format!("panic in {fn_name}")))
}

/// Parse the answer to `todo_build_get_all_todos`.
///
/// Returns a result with `data_tag = TodoList` on success.
#[unsafe(no_mangle)]
pub extern "C" fn todo_parse_get_all_todos(
    client: *const FfiTodoClient,
    response: *const FfiHttpResponse,
) -> *mut FfiTodoResult {
    parse_with("todo_parse_get_all_todos", client, response, |c, resp| {
        match c.parse_get_all_todos(resp) {
            Ok(todos) => FfiTodoResult::ok_todo_list(todos),
            Err(e) => FfiTodoResult::from_error(e),
        }
    })
}

/// Parse the answer to `todo_build_add_todo`.
///
/// Returns a result with `data_tag = Todo` on success.
#[unsafe(no_mangle)]
pub extern "C" fn todo_parse_add_todo(
    client: *const FfiTodoClient,
    response: *const FfiHttpResponse,
) -> *mut FfiTodoResult {
    parse_with("todo_parse_add_todo", client, response, |c, resp| {
        match c.parse_add_todo(resp) {
            Ok(todo) => FfiTodoResult::ok_todo(todo),
            Err(e) => FfiTodoResult::from_error(e),
        }
    })
}

/// Parse the answer to `todo_build_update_todo_status`.
///
/// Returns a result with `data_tag = Json` on success, holding whatever the
/// server sent (`null` for an empty body).
#[unsafe(no_mangle)]
pub extern "C" fn todo_parse_update_todo_status(
    client: *const FfiTodoClient,
    response: *const FfiHttpResponse,
) -> *mut FfiTodoResult {
    parse_with("todo_parse_update_todo_status", client, response, |c, resp| {
        match c.parse_update_todo_status(resp) {
            Ok(value) => FfiTodoResult::ok_json(value),
            Err(e) => FfiTodoResult::from_error(e),
        }
    })
}

/// Parse the answer to `todo_build_delete_todo`.
///
/// Returns a result with `data_tag = Json` on success; the document is
/// `null` when the server sent an empty body.
#[unsafe(no_mangle)]
pub extern "C" fn todo_parse_delete_todo(
    client: *const FfiTodoClient,
    response: *const FfiHttpResponse,
) -> *mut FfiTodoResult {
    parse_with("todo_parse_delete_todo", client, response, |c, resp| {
        match c.parse_delete_todo(resp) {
            Ok(value) => FfiTodoResult::ok_json(value),
            Err(e) => FfiTodoResult::from_error(e),
        }
    })
}

// ---------------------------------------------------------------------------
// Theme preference
// ---------------------------------------------------------------------------

fn new_theme(inner: ThemePreference) -> *mut FfiThemePreference {
    Box::into_raw(Box::new(FfiThemePreference { inner }))
}

/// Create a theme preference seeded from the host's color-scheme signal.
/// Free with `todo_theme_free`.
#[unsafe(no_mangle)]
pub extern "C" fn todo_theme_new(prefers_dark: bool) -> *mut FfiThemePreference {
    let scheme = if prefers_dark {
        ColorScheme::Dark
    } else {
        ColorScheme::Light
    };
    catch_unwind(|| new_theme(ThemePreference::with_scheme(scheme))).unwrap_or(std::ptr::null_mut())
}

/// Create a theme preference seeded from the process environment.
#[unsafe(no_mangle)]
pub extern "C" fn todo_theme_new_from_system() -> *mut FfiThemePreference {
    catch_unwind(|| new_theme(ThemePreference::from_system())).unwrap_or(std::ptr::null_mut())
}

/// Register `callback`. It fires once immediately with the current value and
/// again after every change, always with `user_data`.
///
/// Returns a subscription id for `todo_theme_unsubscribe`, or `u64::MAX` if
/// `theme` or `callback` is null.
#[unsafe(no_mangle)]
pub extern "C" fn todo_theme_subscribe(
    theme: *mut FfiThemePreference,
    callback: Option<FfiThemeCallback>,
    user_data: *mut c_void,
) -> u64 {
    catch_unwind(AssertUnwindSafe(|| {
        let (Some(callback), false) = (callback, theme.is_null()) else {
            return u64::MAX;
        };
        let theme = unsafe { &mut *theme };
        theme
            .inner
            .subscribe(move |is_dark| callback(is_dark, user_data))
            .into_raw()
    }))
    .unwrap_or(u64::MAX)
}

/// Returns true if `subscription` was registered on `theme`.
#[unsafe(no_mangle)]
pub extern "C" fn todo_theme_unsubscribe(theme: *mut FfiThemePreference, subscription: u64) -> bool {
    catch_unwind(AssertUnwindSafe(|| {
        if theme.is_null() {
            return false;
        }
        let theme = unsafe { &mut *theme };
        theme.inner.unsubscribe(SubscriptionId::from_raw(subscription))
    }))
    .unwrap_or(false)
}

/// Flip the flag, notify subscribers, and return the new value.
/// Returns false if `theme` is null.
#[unsafe(no_mangle)]
pub extern "C" fn todo_theme_toggle(theme: *mut FfiThemePreference) -> bool {
    catch_unwind(AssertUnwindSafe(|| {
        if theme.is_null() {
            return false;
        }
        let theme = unsafe { &mut *theme };
        theme.inner.toggle_theme();
        theme.inner.is_dark()
    }))
    .unwrap_or(false)
}

/// Current flag value. Returns false if `theme` is null.
#[unsafe(no_mangle)]
pub extern "C" fn todo_theme_is_dark(theme: *const FfiThemePreference) -> bool {
    catch_unwind(AssertUnwindSafe(|| {
        if theme.is_null() {
            return false;
        }
        unsafe { &*theme }.inner.is_dark()
    }))
    .unwrap_or(false)
}

/// Free a theme preference and every subscription on it. Safe to call with
/// null.
#[unsafe(no_mangle)]
pub extern "C" fn todo_theme_free(theme: *mut FfiThemePreference) {
    if !theme.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(theme) });
        }));
    }
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by any `todo_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn todo_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        todo_free_string(req.path);
        todo_free_string(req.body);
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    req.headers,
                    req.headers_len as usize,
                ))
            };
            for h in headers.iter() {
                todo_free_string(h.key);
                todo_free_string(h.value);
            }
        }
    });
}

/// Free an `FfiTodoResult` returned by any `todo_parse_*` function.
/// Safe to call with null. Uses `data_tag` to determine what `data` points to.
#[unsafe(no_mangle)]
pub extern "C" fn todo_free_result(result: *mut FfiTodoResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        todo_free_string(result.error_message);
        if result.data.is_null() {
            return;
        }
        match result.data_tag {
            FfiDataTag::Todo => {
                let todo = unsafe { Box::from_raw(result.data as *mut FfiTodo) };
                free_ffi_todo_fields(&todo);
            }
            FfiDataTag::TodoList => {
                let list = unsafe { Box::from_raw(result.data as *mut FfiTodoList) };
                if !list.items.is_null() && list.len > 0 {
                    let items = unsafe {
                        Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                            list.items,
                            list.len as usize,
                        ))
                    };
                    for item in items.iter() {
                        free_ffi_todo_fields(item);
                    }
                }
            }
            FfiDataTag::Json => todo_free_string(result.data as *mut c_char),
            FfiDataTag::None => {}
        }
    });
}

/// Free the C-string fields of an `FfiTodo` (but not the struct itself).
fn free_ffi_todo_fields(todo: &FfiTodo) {
    todo_free_string(todo.id);
    todo_free_string(todo.value);
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn todo_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { CString::from_raw(s) });
        });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
