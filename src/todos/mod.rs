//! Todo API served from a route tree.
//!
//! ```text
//! /api/todos            GET list, POST create, otherwise 405
//! /api/todos/{todoId}   GET, PUT, DELETE, otherwise 405
//! /**                   404
//! ```

pub mod handlers;
pub mod store;

pub use store::{Todo, TodoInput, TodoStore};

use crate::routing::{handlers as stock, Router, RequestFilter};

/// Build the todo route tree over `store`.
pub fn routes(store: TodoStore) -> Router {
    let mut router = Router::new();
    router
        .register("/api/todos", |todos| {
            todos.register(&format!("/{{{}}}", handlers::TODO_ID), |todo| {
                let s = store.clone();
                todo.filter(RequestFilter::get())
                    .handle_fn(move |_, params| handlers::get(&s, params));
                let s = store.clone();
                todo.filter(RequestFilter::put())
                    .handle_fn(move |req, params| handlers::replace(&s, req, params));
                let s = store.clone();
                todo.filter(RequestFilter::delete())
                    .handle_fn(move |_, params| handlers::delete(&s, params));
                todo.handle(stock::method_not_allowed());
            });

            let s = store.clone();
            todos
                .filter(RequestFilter::get())
                .handle_fn(move |_, _| handlers::list(&s));
            let s = store.clone();
            todos
                .filter(RequestFilter::post())
                .handle_fn(move |req, _| handlers::create(&s, req));
            todos.handle(stock::method_not_allowed());
        })
        .register("/**", |catch_all| {
            catch_all.handle(stock::not_found());
        });
    router
}
