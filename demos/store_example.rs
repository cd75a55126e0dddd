//! Store example with complex state
//!
//! Run with `RUST_LOG=vibra=trace cargo run --example store_example` to see
//! the store's own tracing events.

use std::rc::Rc;

use tracing_subscriber::EnvFilter;
use vibra::{Store, SubscribeOptions};

#[derive(Clone, Debug)]
struct TodoItem {
    id: usize,
    text: String,
    completed: bool,
}

#[derive(Clone, Debug)]
struct AppState {
    todos: Vec<TodoItem>,
    filter: String,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Store Example ===\n");

    // Each state is a new Rc, so every replacement counts as a change
    let store = Store::new(Rc::new(AppState {
        todos: vec![],
        filter: "all".to_string(),
    }));

    // Subscribe to state changes, including the current state
    let unsubscribe = store.subscribe_with(
        |state: &Rc<AppState>| {
            println!(
                "State updated! Active todos: {} (filter: {})",
                state.todos.iter().filter(|t| !t.completed).count(),
                state.filter
            );
        },
        SubscribeOptions::new().call_on_subscribe(true),
    );

    // Add a todo
    println!("\nAdding todo...");
    store.update(|state| {
        let mut next = AppState::clone(state);
        next.todos.push(TodoItem {
            id: 1,
            text: "Learn Vibra".to_string(),
            completed: false,
        });
        Rc::new(next)
    });

    // Setting the same Rc again is ignored
    println!("\nRe-setting the current state...");
    store.set(store.get());

    // Complete the todo
    println!("\nCompleting todo...");
    store.update(|state| {
        let mut next = AppState::clone(state);
        if let Some(todo) = next.todos.iter_mut().find(|t| t.id == 1) {
            todo.completed = true;
        }
        Rc::new(next)
    });

    unsubscribe.unsubscribe();

    println!("\nFiltering after unsubscribe (no output expected)...");
    store.update(|state| {
        let mut next = AppState::clone(state);
        next.filter = "done".to_string();
        Rc::new(next)
    });

    // Read final state
    println!("\nFinal state: {:#?}", store.get());
    let texts: Vec<String> = store.with(|s| s.todos.iter().map(|t| t.text.clone()).collect());
    println!("Todo texts: {:?}", texts);
}
