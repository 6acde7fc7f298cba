//! Force-once cells for deferred values.
//!
//! A [`LazySlot`] starts either ready or holding a computation. Forcing takes
//! the computation out (the slot is `Forcing` while it runs), runs it against
//! a caller-provided context, and stores the result so later reads never run it
//! again. A read observing `Forcing` means the computation needs its own result:
//! it gets the slot's stand-in value when one was given, and is otherwise
//! reported by the owner as an error rather than looping.
//!
//! The context is passed by `&mut` to the computation, so the slot itself must
//! not be borrowed while the computation runs: owners call [`LazySlot::begin`],
//! release their borrow, run the returned [`Thunk`] and then [`LazySlot::fill`].

/// Deferred computation producing a `T` from a context `C`.
pub type Thunk<C, T, E> = Box<dyn FnOnce(&mut C) -> Result<T, E>>;

pub enum LazySlot<C, T, E> {
    /// Pending computation, with the value reads get while it runs.
    Deferred(Thunk<C, T, E>, Option<T>),
    Forcing(Option<T>),
    Ready(T),
}

/// What a reader should do after calling [`LazySlot::begin`].
pub enum Begin<C, T, E> {
    /// The value is available.
    Ready(T),
    /// The value is being computed further up the call chain.
    Busy,
    /// Run this computation, then [`LazySlot::fill`] the slot.
    Run(Thunk<C, T, E>),
}

impl<C, T: Copy, E> LazySlot<C, T, E> {
    pub fn ready(value: T) -> Self {
        LazySlot::Ready(value)
    }

    pub fn deferred(thunk: impl FnOnce(&mut C) -> Result<T, E> + 'static) -> Self {
        LazySlot::Deferred(Box::new(thunk), None)
    }

    /// Value if already computed, without forcing.
    #[inline]
    pub fn get(&self) -> Option<T> {
        match self {
            LazySlot::Ready(value) => Some(*value),
            _ => None,
        }
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        matches!(self, LazySlot::Ready(_))
    }

    /// Start reading the slot; a pending computation is moved out and the slot
    /// is marked `Forcing` until [`fill`](Self::fill) is called.
    pub fn begin(&mut self) -> Begin<C, T, E> {
        match std::mem::replace(self, LazySlot::Forcing(None)) {
            LazySlot::Ready(value) => {
                *self = LazySlot::Ready(value);
                Begin::Ready(value)
            }
            LazySlot::Forcing(stand_in) => {
                *self = LazySlot::Forcing(stand_in);
                stand_in.map_or(Begin::Busy, Begin::Ready)
            }
            LazySlot::Deferred(thunk, stand_in) => {
                *self = LazySlot::Forcing(stand_in);
                Begin::Run(thunk)
            }
        }
    }

    pub fn fill(&mut self, value: T) {
        debug_assert!(
            matches!(self, LazySlot::Forcing(_)),
            "only a slot being forced can be filled"
        );
        *self = LazySlot::Ready(value);
    }
}

impl<C, T: std::fmt::Debug, E> std::fmt::Debug for LazySlot<C, T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LazySlot::Deferred(..) => f.write_str("Deferred(..)"),
            LazySlot::Forcing(_) => f.write_str("Forcing"),
            LazySlot::Ready(value) => f.debug_tuple("Ready").field(value).finish(),
        }
    }
}
