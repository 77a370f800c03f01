//! Controlled values.
//!
//! A widget's value comes from, in decreasing precedence, a two-way
//! [`Binding`], a shared [`StateRef`], or a literal. The source is resolved
//! once while building into a [`Controlled`] cell that handlers read and
//! write without caring which source it was.

use std::cell::RefCell;
use std::rc::Rc;

/// Shared mutable application state.
pub type StateRef<T> = Rc<RefCell<T>>;

/// Create a [`StateRef`].
pub fn state<T>(value: T) -> StateRef<T> {
    Rc::new(RefCell::new(value))
}

/// A two-way binding to a value owned elsewhere.
pub struct Binding<T> {
    get: Rc<dyn Fn() -> T>,
    set: Rc<dyn Fn(T)>,
}

impl<T> Clone for Binding<T> {
    fn clone(&self) -> Self {
        Self {
            get: self.get.clone(),
            set: self.set.clone(),
        }
    }
}

impl<T> std::fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Binding")
    }
}

impl<T> Binding<T> {
    /// Create a binding from getter and setter closures.
    pub fn new(get: impl Fn() -> T + 'static, set: impl Fn(T) + 'static) -> Self {
        Self {
            get: Rc::new(get),
            set: Rc::new(set),
        }
    }

    /// Read the bound value.
    pub fn get(&self) -> T {
        (self.get)()
    }

    /// Write the bound value.
    pub fn set(&self, value: T) {
        (self.set)(value);
    }
}

impl<T: Clone + 'static> Binding<T> {
    /// Bind directly to a state cell.
    pub fn from_state(state: &StateRef<T>) -> Self {
        let read = state.clone();
        let write = state.clone();
        Self::new(move || read.borrow().clone(), move |v| *write.borrow_mut() = v)
    }
}

/// Where a widget's value comes from.
#[derive(Debug, Clone)]
pub struct ValueSource<T> {
    /// Authoritative two-way binding.
    pub binding: Option<Binding<T>>,
    /// State pointer; kept in sync with the binding if both are set.
    pub state: Option<StateRef<T>>,
    /// Literal used when neither is set. Changes made through a literal
    /// last until the next rebuild.
    pub value: T,
}

impl<T: Default> Default for ValueSource<T> {
    fn default() -> Self {
        Self::literal(T::default())
    }
}

impl<T> From<T> for ValueSource<T> {
    fn from(value: T) -> Self {
        Self::literal(value)
    }
}

impl<T> ValueSource<T> {
    /// A literal value.
    pub const fn literal(value: T) -> Self {
        Self {
            binding: None,
            state: None,
            value,
        }
    }

    /// Add a binding.
    #[must_use]
    pub fn with_binding(mut self, binding: Binding<T>) -> Self {
        self.binding = Some(binding);
        self
    }

    /// Add a state pointer.
    #[must_use]
    pub fn with_state(mut self, state: StateRef<T>) -> Self {
        self.state = Some(state);
        self
    }
}

impl<T: Clone + Default> ValueSource<T> {
    /// A value backed by a state pointer.
    pub fn from_state(state: StateRef<T>) -> Self {
        Self::default().with_state(state)
    }

    /// A value backed by a binding.
    pub fn from_binding(binding: Binding<T>) -> Self {
        Self::default().with_binding(binding)
    }
}

/// A resolved value plus its write-back targets.
pub struct Controlled<T> {
    current: RefCell<T>,
    binding: Option<Binding<T>>,
    state: Option<StateRef<T>>,
    normalize: Box<dyn Fn(T) -> T>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for Controlled<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controlled")
            .field("current", &self.current)
            .field("bound", &self.binding.is_some())
            .field("stateful", &self.state.is_some())
            .finish()
    }
}

impl<T: Clone + 'static> Controlled<T> {
    /// Resolve a source. `normalize` clamps values into the widget's valid
    /// range and is applied on every read and write.
    pub fn resolve(source: ValueSource<T>, normalize: impl Fn(T) -> T + 'static) -> Rc<Self> {
        let ValueSource { binding, state, value } = source;
        let initial = match (&binding, &state) {
            (Some(binding), _) => binding.get(),
            (None, Some(state)) => state.borrow().clone(),
            (None, None) => value,
        };
        let initial = normalize(initial);
        Rc::new(Self {
            current: RefCell::new(initial),
            binding,
            state,
            normalize: Box::new(normalize),
        })
    }

    /// Resolve a source without normalization.
    pub fn resolve_raw(source: ValueSource<T>) -> Rc<Self> {
        Self::resolve(source, |v| v)
    }

    /// The current value.
    pub fn get(&self) -> T {
        self.current.borrow().clone()
    }

    /// Normalize and store `value`, writing through to the binding and the
    /// state pointer. Returns the stored value.
    pub fn set(&self, value: T) -> T {
        let value = (self.normalize)(value);
        *self.current.borrow_mut() = value.clone();
        if let Some(binding) = &self.binding {
            binding.set(value.clone());
        }
        if let Some(state) = &self.state {
            *state.borrow_mut() = value.clone();
        }
        value
    }

    /// Apply `f` to the current value and store the result.
    pub fn update(&self, f: impl FnOnce(T) -> T) -> T {
        self.set(f(self.get()))
    }
}

/// Clamp a fraction into `[0, 1]`. NaN becomes 0.
pub fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Clamp an index into `[0, count - 1]` (0 when `count` is 0).
pub const fn clamp_index(index: usize, count: usize) -> usize {
    if count == 0 {
        0
    } else if index >= count {
        count - 1
    } else {
        index
    }
}
