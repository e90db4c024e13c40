// Intercepting every event of a document and printing what fired.
//
// The document declares its events with `#[event_surface]`; an interceptor attaches to all of
// them and a single listener on the interceptor sees each firing by name.

use std::sync::Arc;

use rusty_intercept::{
    Component, Event, Handler, Interception, Interceptor, Subject, event_surface,
};

#[derive(Debug)]
struct DocumentEvent {
    path: String,
}

impl Event for DocumentEvent {}

#[derive(Default)]
struct Document {
    events: Component<DocumentEvent>,
}

impl Subject for Document {
    type Event = DocumentEvent;

    fn attach_handler(&self, event_name: &str, handler: Arc<dyn Handler<DocumentEvent>>) {
        self.events.attach_shared(event_name, handler);
    }
}

#[event_surface]
impl Document {
    fn on_open(&self, path: &str) {
        self.fire("on_open", path);
    }

    fn on_save(&self, path: &str) {
        self.fire("on_save", path);
    }

    fn on_close(&self, path: &str) {
        self.fire("on_close", path);
    }

    fn fire(&self, event_name: &str, path: &str) {
        self.events.raise(
            event_name,
            Arc::new(DocumentEvent {
                path: path.to_owned(),
            }),
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let document = Document::default();
    let interceptor = Interceptor::new();

    let attached = interceptor.initialize(&document)?;
    println!("Intercepting {} event(s)", attached);

    interceptor.on_intercepted(|interception: &Arc<Interception<DocumentEvent>>| {
        println!(
            "{} -> {} ({})",
            interception.sender(),
            interception.event_name(),
            interception.event().path
        );
    });

    document.on_open("notes.txt");
    document.on_save("notes.txt");
    document.on_close("notes.txt");

    Ok(())
}
