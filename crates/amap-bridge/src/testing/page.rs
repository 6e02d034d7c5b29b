use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use amap_common::{Platform, Rect};

use crate::host::{Callback, HostElement, HostPage, ListenerHandle};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Default)]
struct Registrations {
    next_id: u64,
    entries: Vec<(u64, String, Callback)>,
}

impl Registrations {
    fn add(&mut self, name: &str, callback: Callback) -> u64 {
        self.next_id += 1;
        self.entries.push((self.next_id, name.to_string(), callback));
        self.next_id
    }

    fn remove(&mut self, id: u64) {
        self.entries.retain(|(entry, _, _)| *entry != id);
    }

    fn matching(&self, name: &str) -> Vec<Callback> {
        self.entries
            .iter()
            .filter(|(_, n, _)| n == name)
            .map(|(_, _, cb)| Arc::clone(cb))
            .collect()
    }

    fn count(&self, name: Option<&str>) -> usize {
        self.entries
            .iter()
            .filter(|(_, n, _)| match name {
                Some(name) => n == name,
                None => true,
            })
            .count()
    }
}

// =============================================================================
// ELEMENT
// =============================================================================

const RESIZE: &str = "\0resize-observer";

struct ElementState {
    current: Rect,
    scripted: VecDeque<Rect>,
    reads: usize,
    attributes: HashMap<String, String>,
    classes: Vec<String>,
    registrations: Registrations,
}

/// A page element with scriptable geometry.
pub struct FakeElement {
    me: Weak<FakeElement>,
    tag: String,
    parent: Option<Arc<FakeElement>>,
    state: Mutex<ElementState>,
}

impl FakeElement {
    pub fn new(tag: &str) -> Arc<Self> {
        Self::build(tag, None)
    }

    pub fn child_of(tag: &str, parent: &Arc<FakeElement>) -> Arc<Self> {
        Self::build(tag, Some(Arc::clone(parent)))
    }

    fn build(tag: &str, parent: Option<Arc<FakeElement>>) -> Arc<Self> {
        Arc::new_cyclic(|me| Self {
            me: me.clone(),
            tag: tag.to_string(),
            parent,
            state: Mutex::new(ElementState {
                current: Rect::default(),
                scripted: VecDeque::new(),
                reads: 0,
                attributes: HashMap::new(),
                classes: Vec::new(),
                registrations: Registrations::default(),
            }),
        })
    }

    pub fn add_class(&self, class: &str) {
        lock(&self.state).classes.push(class.to_string());
    }

    /// Set the rectangle every following read returns.
    pub fn set_rect(&self, rect: Rect) {
        let mut state = lock(&self.state);
        state.scripted.clear();
        state.current = rect;
    }

    /// Queue rectangles returned by the next reads, one per read. Once the
    /// queue is drained the last one keeps being returned.
    pub fn script_rects(&self, rects: impl IntoIterator<Item = Rect>) {
        lock(&self.state).scripted.extend(rects);
    }

    /// Number of `bounding_rect` reads so far.
    pub fn reads(&self) -> usize {
        lock(&self.state).reads
    }

    /// Current rectangle without counting a read.
    pub fn peek_rect(&self) -> Rect {
        lock(&self.state).current
    }

    /// Change the rectangle and notify resize observers.
    pub fn resize_to(&self, rect: Rect) {
        self.set_rect(rect);
        self.trigger_resize();
    }

    pub fn trigger_resize(&self) {
        self.dispatch(RESIZE);
    }

    /// Fire an element event (e.g. a page-container lifecycle event).
    pub fn dispatch(&self, event: &str) {
        let callbacks = lock(&self.state).registrations.matching(event);
        for cb in callbacks {
            cb();
        }
    }

    pub fn event_listener_count(&self) -> usize {
        let state = lock(&self.state);
        state.registrations.count(None) - state.registrations.count(Some(RESIZE))
    }

    pub fn observer_count(&self) -> usize {
        lock(&self.state).registrations.count(Some(RESIZE))
    }

    fn matches(&self, selector: &str) -> bool {
        match selector.strip_prefix('.') {
            Some(class) => lock(&self.state).classes.iter().any(|c| c == class),
            None => self.tag.eq_ignore_ascii_case(selector),
        }
    }

    fn register(&self, name: &str, callback: Callback) -> ListenerHandle {
        let id = lock(&self.state).registrations.add(name, callback);
        let me = self.me.clone();
        ListenerHandle::new(move || {
            if let Some(el) = me.upgrade() {
                lock(&el.state).registrations.remove(id);
            }
        })
    }
}

impl HostElement for FakeElement {
    fn bounding_rect(&self) -> Rect {
        let mut state = lock(&self.state);
        state.reads += 1;
        if let Some(next) = state.scripted.pop_front() {
            state.current = next;
        }
        state.current
    }

    fn set_data_attribute(&self, name: &str, value: &str) {
        lock(&self.state)
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    fn data_attribute(&self, name: &str) -> Option<String> {
        lock(&self.state).attributes.get(name).cloned()
    }

    fn closest(&self, selector: &str) -> Option<Arc<dyn HostElement>> {
        if self.matches(selector) {
            return self.me.upgrade().map(|el| el as Arc<dyn HostElement>);
        }
        self.parent.as_ref()?.closest(selector)
    }

    fn add_event_listener(&self, event: &str, callback: Callback) -> ListenerHandle {
        self.register(event, callback)
    }

    fn observe_resize(&self, callback: Callback) -> ListenerHandle {
        self.register(RESIZE, callback)
    }
}

// =============================================================================
// PAGE
// =============================================================================

const ORIENTATION: &str = "\0screen-orientation";

struct PageState {
    registrations: Registrations,
    stack: Vec<Arc<FakeElement>>,
    scroll_enabled: Vec<String>,
}

/// A page with window listeners, an optional orientation API, and a stack
/// of elements for hit testing.
pub struct FakePage {
    me: Weak<FakePage>,
    platform: Platform,
    device_pixel_ratio: f64,
    orientation_api: bool,
    state: Mutex<PageState>,
}

impl FakePage {
    pub fn new(platform: Platform) -> Arc<Self> {
        Self::build(platform, 2.0, true)
    }

    /// A page whose screen-orientation API is missing.
    pub fn without_orientation_api(platform: Platform) -> Arc<Self> {
        Self::build(platform, 2.0, false)
    }

    pub fn with_device_pixel_ratio(platform: Platform, device_pixel_ratio: f64) -> Arc<Self> {
        Self::build(platform, device_pixel_ratio, true)
    }

    fn build(platform: Platform, device_pixel_ratio: f64, orientation_api: bool) -> Arc<Self> {
        Arc::new_cyclic(|me| Self {
            me: me.clone(),
            platform,
            device_pixel_ratio,
            orientation_api,
            state: Mutex::new(PageState {
                registrations: Registrations::default(),
                stack: Vec::new(),
                scroll_enabled: Vec::new(),
            }),
        })
    }

    /// Put an element on top of the hit-test stack.
    pub fn stack_element(&self, element: &Arc<FakeElement>) {
        lock(&self.state).stack.push(Arc::clone(element));
    }

    pub fn dispatch_window_event(&self, event: &str) {
        let callbacks = lock(&self.state).registrations.matching(event);
        for cb in callbacks {
            cb();
        }
    }

    /// Rotate the device: fires the orientation API, or the legacy window
    /// event when the API is missing.
    pub fn rotate(&self) {
        if self.orientation_api {
            self.dispatch_window_event(ORIENTATION);
        } else {
            self.dispatch_window_event("orientationchange");
        }
    }

    pub fn window_listener_count(&self) -> usize {
        let state = lock(&self.state);
        state.registrations.count(None) - state.registrations.count(Some(ORIENTATION))
    }

    pub fn orientation_listener_count(&self) -> usize {
        lock(&self.state).registrations.count(Some(ORIENTATION))
    }

    /// Window listeners registered for one event name.
    pub fn listeners_for(&self, event: &str) -> usize {
        lock(&self.state).registrations.count(Some(event))
    }

    /// Tags for which scroll events were enabled, in call order.
    pub fn scroll_enabled_tags(&self) -> Vec<String> {
        lock(&self.state).scroll_enabled.clone()
    }

    fn register(&self, name: &str, callback: Callback) -> ListenerHandle {
        let id = lock(&self.state).registrations.add(name, callback);
        let me = self.me.clone();
        ListenerHandle::new(move || {
            if let Some(page) = me.upgrade() {
                lock(&page.state).registrations.remove(id);
            }
        })
    }
}

impl HostPage for FakePage {
    fn platform(&self) -> Platform {
        self.platform
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    fn element_from_point(&self, x: f64, y: f64) -> Option<Arc<dyn HostElement>> {
        let state = lock(&self.state);
        state
            .stack
            .iter()
            .rev()
            .find(|el| el.peek_rect().contains(x, y))
            .map(|el| Arc::clone(el) as Arc<dyn HostElement>)
    }

    fn add_window_listener(&self, event: &str, callback: Callback) -> ListenerHandle {
        self.register(event, callback)
    }

    fn add_orientation_listener(&self, callback: Callback) -> Option<ListenerHandle> {
        self.orientation_api
            .then(|| self.register(ORIENTATION, callback))
    }

    fn enable_scroll_events(&self, tag: &str) {
        lock(&self.state).scroll_enabled.push(tag.to_string());
    }
}
