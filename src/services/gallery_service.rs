use std::time::Duration;

/// Horizontal travel, in pixels, a touch must exceed to count as a swipe.
pub const SWIPE_THRESHOLD_PX: f64 = 50.0;
pub const AUTOPLAY_INTERVAL: Duration = Duration::from_millis(5000);

/// Position within a ring of `len` slides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CyclicIndex {
    index: usize,
    len: usize,
}

impl CyclicIndex {
    pub fn new(len: usize, initial: usize) -> Self {
        let index = if initial < len { initial } else { 0 };
        Self { index, len }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn next(&mut self) -> usize {
        if self.len > 0 {
            self.index = (self.index + 1) % self.len;
        }
        self.index
    }

    pub fn prev(&mut self) -> usize {
        if self.len > 0 {
            self.index = (self.index + self.len - 1) % self.len;
        }
        self.index
    }

    /// Out-of-range targets leave the position unchanged.
    pub fn jump_to(&mut self, target: usize) -> usize {
        if target < self.len {
            self.index = target;
        }
        self.index
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Next,
    Prev,
}

/// Left swipes (finger moving towards lower x) advance; right swipes go back.
pub fn classify_swipe(start_x: f64, end_x: f64) -> Option<SwipeDirection> {
    let distance = start_x - end_x;
    if distance > SWIPE_THRESHOLD_PX {
        Some(SwipeDirection::Next)
    } else if distance < -SWIPE_THRESHOLD_PX {
        Some(SwipeDirection::Prev)
    } else {
        None
    }
}

/// Tracks one touch gesture from start to end.
#[derive(Debug, Default, Clone, Copy)]
struct Touch {
    start: Option<f64>,
    end: Option<f64>,
}

impl Touch {
    fn start(&mut self, x: f64) {
        self.start = Some(x);
        self.end = None;
    }

    fn moved(&mut self, x: f64) {
        self.end = Some(x);
    }

    fn finish(&mut self) -> Option<SwipeDirection> {
        match (self.start.take(), self.end.take()) {
            (Some(start), Some(end)) => classify_swipe(start, end),
            _ => None,
        }
    }
}

pub fn valid_images(images: &[String]) -> Vec<String> {
    images
        .iter()
        .filter(|i| !i.trim().is_empty())
        .cloned()
        .collect()
}

/// Inline hero carousel with optional autoplay.
#[derive(Debug, Clone)]
pub struct ImageCarousel {
    images: Vec<String>,
    position: CyclicIndex,
    autoplay: bool,
    paused: bool,
    touch: Touch,
}

impl ImageCarousel {
    pub fn new(images: &[String], initial: usize, autoplay: bool) -> Self {
        let images = valid_images(images);
        let position = CyclicIndex::new(images.len(), initial);
        Self {
            images,
            position,
            autoplay,
            paused: false,
            touch: Touch::default(),
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.images.get(self.position.index()).map(String::as_str)
    }

    pub fn index(&self) -> usize {
        self.position.index()
    }

    pub fn next(&mut self) -> usize {
        self.position.next()
    }

    pub fn prev(&mut self) -> usize {
        self.position.prev()
    }

    pub fn go_to(&mut self, index: usize) -> usize {
        self.position.jump_to(index)
    }

    /// Hovering pauses autoplay.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn autoplay_active(&self) -> bool {
        self.autoplay && self.images.len() > 1 && !self.paused
    }

    /// Called once per [`AUTOPLAY_INTERVAL`]; advances only while autoplay is active.
    pub fn tick(&mut self) -> usize {
        if self.autoplay_active() {
            self.position.next();
        }
        self.position.index()
    }

    pub fn touch_start(&mut self, x: f64) {
        self.paused = true;
        self.touch.start(x);
    }

    pub fn touch_move(&mut self, x: f64) {
        self.touch.moved(x);
    }

    pub fn touch_end(&mut self) -> usize {
        self.paused = false;
        match self.touch.finish() {
            Some(SwipeDirection::Next) => self.position.next(),
            Some(SwipeDirection::Prev) => self.position.prev(),
            None => self.position.index(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryKey {
    ArrowLeft,
    ArrowRight,
    Escape,
    Other,
}

/// Full-screen gallery. Keyboard input is only honoured while open.
#[derive(Debug, Clone)]
pub struct GalleryModal {
    images: Vec<String>,
    position: CyclicIndex,
    open: bool,
    touch: Touch,
}

impl GalleryModal {
    pub fn new(images: &[String]) -> Self {
        let images = valid_images(images);
        let position = CyclicIndex::new(images.len(), 0);
        Self {
            images,
            position,
            open: false,
            touch: Touch::default(),
        }
    }

    /// Opening an empty gallery is a no-op.
    pub fn open_at(&mut self, index: usize) {
        if self.images.is_empty() {
            return;
        }
        self.position = CyclicIndex::new(self.images.len(), index);
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn index(&self) -> usize {
        self.position.index()
    }

    pub fn current(&self) -> Option<&str> {
        if !self.open {
            return None;
        }
        self.images.get(self.position.index()).map(String::as_str)
    }

    /// `"3 / 7"` style counter.
    pub fn counter(&self) -> String {
        format!("{} / {}", self.position.index() + 1, self.images.len())
    }

    pub fn next(&mut self) -> usize {
        self.position.next()
    }

    pub fn prev(&mut self) -> usize {
        self.position.prev()
    }

    pub fn select(&mut self, index: usize) -> usize {
        self.position.jump_to(index)
    }

    pub fn handle_key(&mut self, key: GalleryKey) {
        if !self.open {
            return;
        }
        match key {
            GalleryKey::ArrowLeft => {
                self.position.prev();
            }
            GalleryKey::ArrowRight => {
                self.position.next();
            }
            GalleryKey::Escape => self.close(),
            GalleryKey::Other => {}
        }
    }

    pub fn touch_start(&mut self, x: f64) {
        self.touch.start(x);
    }

    pub fn touch_move(&mut self, x: f64) {
        self.touch.moved(x);
    }

    pub fn touch_end(&mut self) -> usize {
        match self.touch.finish() {
            Some(SwipeDirection::Next) => self.position.next(),
            Some(SwipeDirection::Prev) => self.position.prev(),
            None => self.position.index(),
        }
    }
}
