//! Event dispatch with a single-slot replay buffer per event tag.
//!
//! UI-side consumers register after navigation, but the server may emit a
//! defining event (the initial roster, for instance) the moment the socket
//! opens. Each tag therefore holds at most the most recent unconsumed
//! envelope until a subscriber attaches; older envelopes are superseded,
//! never queued.

use protocol::{Event, Message};
use std::collections::HashMap;

type Callback = Box<dyn FnMut(&Message)>;

#[derive(Default)]
pub struct Dispatcher {
    listeners: HashMap<Event, Callback>,
    missed: HashMap<Event, Message>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches the single callback for `event`. A buffered envelope for the
    /// tag is replayed synchronously, exactly once, before the callback is
    /// installed, so no frame can slip between "buffered" and "subscribed".
    pub fn subscribe<F>(&mut self, event: Event, mut callback: F)
    where
        F: FnMut(&Message) + 'static,
    {
        if let Some(missed) = self.missed.remove(&event) {
            callback(&missed);
        }
        self.listeners.insert(event, Box::new(callback));
    }

    /// Detaches the callback for `event` and discards any buffered envelope.
    pub fn unsubscribe(&mut self, event: Event) {
        self.listeners.remove(&event);
        self.missed.remove(&event);
    }

    pub fn dispatch(&mut self, message: Message) {
        match self.listeners.get_mut(&message.event) {
            Some(callback) => callback(&message),
            None => {
                self.missed.insert(message.event, message);
            }
        }
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
        self.missed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn message(event: Event, id: i32) -> Message {
        Message {
            event,
            id: Some(id),
            time: None,
            payload: None,
        }
    }

    #[test]
    fn subscribed_callback_receives_frames_in_order() {
        let mut dispatcher = Dispatcher::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        dispatcher.subscribe(Event::Move, move |msg| sink.borrow_mut().push(msg.id));

        dispatcher.dispatch(message(Event::Move, 1));
        dispatcher.dispatch(message(Event::Move, 2));

        assert_eq!(*seen.borrow(), vec![Some(1), Some(2)]);
    }

    #[test]
    fn late_subscriber_gets_only_the_most_recent_envelope() {
        let mut dispatcher = Dispatcher::new();

        dispatcher.dispatch(message(Event::Join, 1));
        dispatcher.dispatch(message(Event::Join, 2));
        dispatcher.dispatch(message(Event::Join, 3));

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        dispatcher.subscribe(Event::Join, move |msg| sink.borrow_mut().push(msg.id));

        assert_eq!(*seen.borrow(), vec![Some(3)]);
    }

    #[test]
    fn replay_happens_exactly_once() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.dispatch(message(Event::Ready, 7));

        let count = Rc::new(RefCell::new(0));

        let sink = Rc::clone(&count);
        dispatcher.subscribe(Event::Ready, move |_| *sink.borrow_mut() += 1);
        assert_eq!(*count.borrow(), 1);

        // Re-subscribing without a new envelope delivers nothing.
        let sink = Rc::clone(&count);
        dispatcher.subscribe(Event::Ready, move |_| *sink.borrow_mut() += 1);
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn buffering_is_per_tag() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.dispatch(message(Event::Join, 1));
        dispatcher.dispatch(message(Event::Ready, 2));

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        dispatcher.subscribe(Event::Ready, move |msg| sink.borrow_mut().push(msg.id));

        assert_eq!(*seen.borrow(), vec![Some(2)]);
    }

    #[test]
    fn unsubscribe_discards_buffer_and_callback() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.dispatch(message(Event::Spawn, 1));
        dispatcher.unsubscribe(Event::Spawn);

        let called = Rc::new(RefCell::new(false));
        let sink = Rc::clone(&called);
        dispatcher.subscribe(Event::Spawn, move |_| *sink.borrow_mut() = true);

        assert!(!*called.borrow());
    }

    #[test]
    fn clear_drops_everything() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.dispatch(message(Event::Kick, 3));

        let called = Rc::new(RefCell::new(false));
        let sink = Rc::clone(&called);
        dispatcher.subscribe(Event::Move, move |_| *sink.borrow_mut() = true);

        dispatcher.clear();
        dispatcher.dispatch(message(Event::Move, 1));
        assert!(!*called.borrow());

        let kick_seen = Rc::new(RefCell::new(false));
        let sink = Rc::clone(&kick_seen);
        dispatcher.subscribe(Event::Kick, move |_| *sink.borrow_mut() = true);
        assert!(!*kick_seen.borrow());
    }
}
