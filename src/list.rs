use std::fmt;
use std::mem;
use std::ptr::{self, NonNull};

/// A node in the doubly linked list.
///
/// Contains a value and pointers to the previous and next nodes.
/// This structure is not meant to be used directly by users of the `List`.
pub struct Node<T> {
    /// The value stored in this node. Uses `MaybeUninit` to allow for sigil nodes.
    val: mem::MaybeUninit<T>,
    /// Pointer to the previous node in the list.
    prev: *mut Node<T>,
    /// Pointer to the next node in the list.
    next: *mut Node<T>,
}

impl<T> Node<T> {
    /// Creates a new node with the given value.
    fn new(val: T) -> Self {
        Node {
            val: mem::MaybeUninit::new(val),
            prev: ptr::null_mut(),
            next: ptr::null_mut(),
        }
    }

    /// Creates a new sigil (sentinel) node without initializing the value.
    ///
    /// Sigil nodes are used as head and tail markers in the list.
    fn new_sigil() -> Self {
        Node {
            val: mem::MaybeUninit::uninit(),
            prev: ptr::null_mut(),
            next: ptr::null_mut(),
        }
    }

    /// Extracts the value from this node.
    ///
    /// # Safety
    ///
    /// This function is unsafe because it assumes the value is initialized.
    /// Should only be called on non-sigil nodes.
    pub unsafe fn get_value(&self) -> &T {
        unsafe { self.val.assume_init_ref() }
    }

    /// Extracts a mutable reference to the value from this node.
    ///
    /// # Safety
    ///
    /// This function is unsafe because it assumes the value is initialized.
    /// Should only be called on non-sigil nodes.
    pub unsafe fn get_value_mut(&mut self) -> &mut T {
        unsafe { self.val.assume_init_mut() }
    }
}

/// A doubly linked list implementation with a fixed capacity.
///
/// This list maintains a capacity specified at creation time and provides
/// O(1) operations for adding, removing, and updating elements. Sentinel
/// nodes (sigils) at the head and tail simplify boundary handling.
///
/// A capacity of `0` is legal: the list is permanently full and [`add`]
/// always returns `None`. [`add_unchecked`] and the cross-list attach
/// methods bypass the capacity check entirely, for callers (such as the ARC
/// engine) whose admission bookkeeping spans more than one list.
///
/// [`add`]: List::add
/// [`add_unchecked`]: List::add_unchecked
pub struct List<T> {
    /// Maximum number of items the list should hold under `add`.
    cap: usize,
    /// Current number of items in the list.
    len: usize,
    /// Pointer to the head sentinel node.
    head: *mut Node<T>,
    /// Pointer to the tail sentinel node.
    tail: *mut Node<T>,
}

impl<T> List<T> {
    /// Creates a new list that holds at most `cap` items via [`add`](List::add).
    pub fn new(cap: usize) -> List<T> {
        let head = Box::into_raw(Box::new(Node::new_sigil()));
        let tail = Box::into_raw(Box::new(Node::new_sigil()));

        let list = List {
            cap,
            len: 0,
            head,
            tail,
        };

        // SAFETY: head and tail are newly allocated, valid pointers.
        unsafe {
            (*list.head).next = list.tail;
            (*list.tail).prev = list.head;
        }

        list
    }

    /// Returns the configured capacity.
    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Returns the current number of items in the list.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the list contains no items.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns true if the list holds at least `cap` items.
    pub fn is_full(&self) -> bool {
        self.len >= self.cap
    }

    /// Removes the first (front) item from the list.
    pub fn remove_first(&mut self) -> Option<Box<Node<T>>> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: head/tail are valid, and the list is non-empty.
        let next = unsafe { (*self.head).next };
        if next != self.tail {
            // SAFETY: next is a live node between the sentinels.
            unsafe { self._detach(next) };
            self.len -= 1;
            // SAFETY: next was just detached and uniquely owned by this list.
            unsafe { Some(Box::from_raw(next)) }
        } else {
            None
        }
    }

    /// Removes the last (back) item from the list.
    pub fn remove_last(&mut self) -> Option<Box<Node<T>>> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: head/tail are valid, and the list is non-empty.
        let prev = unsafe { (*self.tail).prev };
        if prev != self.head {
            // SAFETY: prev is a live node between the sentinels.
            unsafe { self._detach(prev) };
            self.len -= 1;
            // SAFETY: prev was just detached and uniquely owned by this list.
            unsafe { Some(Box::from_raw(prev)) }
        } else {
            None
        }
    }

    /// Detaches an arbitrary node from the list and returns it as a `Box`.
    ///
    /// # Safety
    ///
    /// `node` must be a valid, non-null pointer to a node currently linked
    /// into this list (not a sentinel).
    pub unsafe fn remove(&mut self, node: *mut Node<T>) -> Option<Box<Node<T>>> {
        if self.is_empty() || node.is_null() || node == self.head || node == self.tail {
            return None;
        }

        // SAFETY: caller guarantees node is a live member of this list.
        unsafe {
            self._detach(node);
            self.len -= 1;
            Some(Box::from_raw(node))
        }
    }

    /// Unlinks a node from the list without deallocating it.
    ///
    /// # Safety
    ///
    /// `node`'s `prev`/`next` pointers must reference valid, linked nodes.
    unsafe fn _detach(&mut self, node: *mut Node<T>) {
        // SAFETY: caller guarantees node is linked into this list.
        unsafe {
            (*(*node).prev).next = (*node).next;
            (*(*node).next).prev = (*node).prev;
        }
    }

    /// Attaches a node after the head sentinel, making it the front item.
    ///
    /// Does not adjust `len` — use this when a node is being relocated
    /// within the same list (e.g. [`move_to_front`](List::move_to_front)).
    ///
    /// # Safety
    ///
    /// `node` must be a valid pointer to a node not currently linked into
    /// any list.
    pub unsafe fn attach(&mut self, node: *mut Node<T>) {
        // SAFETY: head is valid; caller guarantees node is unlinked.
        unsafe {
            (*node).next = (*self.head).next;
            (*node).prev = self.head;
            (*self.head).next = node;
            (*(*node).next).prev = node;
        }
    }

    /// Attaches a node before the tail sentinel, making it the back item.
    ///
    /// Does not adjust `len` — see [`attach`](List::attach).
    ///
    /// # Safety
    ///
    /// `node` must be a valid pointer to a node not currently linked into
    /// any list.
    pub unsafe fn attach_last(&mut self, node: *mut Node<T>) {
        // SAFETY: tail is valid; caller guarantees node is unlinked.
        unsafe {
            (*node).next = self.tail;
            (*node).prev = (*self.tail).prev;
            (*self.tail).prev = node;
            (*(*node).prev).next = node;
        }
    }

    /// Attaches a node detached from another list, to the front of this one.
    ///
    /// Increments `len`, unlike [`attach`](List::attach) — use this for
    /// cross-list transfers (e.g. ARC promoting an entry from `T1` to `T2`).
    ///
    /// # Safety
    ///
    /// `node` must be a valid pointer to a node not currently linked into
    /// any list.
    pub unsafe fn attach_from_other_list(&mut self, node: *mut Node<T>) {
        // SAFETY: delegated to `attach`'s contract.
        unsafe { self.attach(node) };
        self.len += 1;
    }

    /// Attaches a node detached from another list, to the back of this one.
    ///
    /// Increments `len` — see [`attach_from_other_list`](List::attach_from_other_list).
    ///
    /// # Safety
    ///
    /// `node` must be a valid pointer to a node not currently linked into
    /// any list.
    pub unsafe fn attach_last_from_other_list(&mut self, node: *mut Node<T>) {
        // SAFETY: delegated to `attach_last`'s contract.
        unsafe { self.attach_last(node) };
        self.len += 1;
    }

    /// Moves a node already in this list to the front. No-op if already
    /// at the front.
    ///
    /// # Safety
    ///
    /// `node` must be a valid pointer to a node currently linked into this
    /// list (not a sentinel).
    pub unsafe fn move_to_front(&mut self, node: *mut Node<T>) {
        if node.is_null() || node == self.head || node == self.tail {
            return;
        }

        // SAFETY: head is valid.
        if unsafe { (*self.head).next } == node {
            return;
        }

        // SAFETY: node is linked into this list per caller's contract.
        unsafe {
            self._detach(node);
            self.attach(node);
        }
    }

    /// Adds a value to the front of the list.
    ///
    /// Returns `None` if the list is already at capacity.
    pub fn add(&mut self, v: T) -> Option<*mut Node<T>> {
        if self.len >= self.cap {
            return None;
        }
        // SAFETY: Box::into_raw never returns null.
        let node = unsafe { NonNull::new_unchecked(Box::into_raw(Box::new(Node::new(v)))) };
        // SAFETY: node is freshly allocated and not linked anywhere.
        unsafe { self.attach(node.as_ptr()) };
        self.len += 1;
        Some(node.as_ptr())
    }

    /// Adds a value to the front of the list, bypassing the capacity check.
    ///
    /// Should be used carefully, only when a caller's own admission
    /// bookkeeping (spanning more than this single list) already accounts
    /// for the total bound — e.g. ARC's combined T1/T2/B1/B2 sizing.
    pub fn add_unchecked(&mut self, v: T) -> *mut Node<T> {
        // SAFETY: Box::into_raw never returns null.
        let node = unsafe { NonNull::new_unchecked(Box::into_raw(Box::new(Node::new(v)))) };
        // SAFETY: node is freshly allocated and not linked anywhere.
        unsafe { self.attach(node.as_ptr()) };
        self.len += 1;
        node.as_ptr()
    }

    /// Replaces the value stored at `node`, optionally returning the old one.
    ///
    /// # Safety
    ///
    /// `node` must be a valid, non-sigil pointer into this list.
    pub unsafe fn update(&mut self, node: *mut Node<T>, v: T, capturing: bool) -> (Option<T>, bool) {
        if node.is_null() {
            return (None, false);
        }
        // SAFETY: caller guarantees node is valid and initialized.
        let old_val =
            unsafe { mem::replace(&mut (*node).val, mem::MaybeUninit::new(v)).assume_init() };

        if capturing {
            (Some(old_val), true)
        } else {
            (None, true)
        }
    }

    /// Returns a reference to the value stored at `node`.
    ///
    /// # Safety
    ///
    /// `node` must be a valid pointer into this list (sentinels yield `None`
    /// safely, but a dangling or foreign pointer is undefined behavior).
    pub unsafe fn get_value(&self, node: *mut Node<T>) -> Option<&T> {
        if node.is_null() || node == self.head || node == self.tail {
            None
        } else {
            // SAFETY: node is non-sentinel and valid per caller's contract.
            Some(unsafe { (*node).get_value() })
        }
    }

    /// Returns a mutable reference to the value stored at `node`.
    ///
    /// # Safety
    ///
    /// See [`get_value`](List::get_value).
    pub unsafe fn get_value_mut(&mut self, node: *mut Node<T>) -> Option<&mut T> {
        if node.is_null() || node == self.head || node == self.tail {
            None
        } else {
            // SAFETY: node is non-sentinel and valid per caller's contract.
            Some(unsafe { (*node).get_value_mut() })
        }
    }

    /// Removes the front item and returns its owned value, freeing the node.
    ///
    /// Unlike [`remove_first`](List::remove_first), which hands back the
    /// boxed node itself (useful when a caller wants to reattach it into
    /// another list without reallocating), this drops the node and yields
    /// just the value — for callers that are done with the entry entirely
    /// (e.g. discarding a ghost key).
    pub fn pop_front(&mut self) -> Option<T> {
        self.remove_first()
            // SAFETY: a non-sigil node removed from this list always holds
            // an initialized value.
            .map(|boxed| unsafe { boxed.val.assume_init_read() })
    }

    /// Removes the back item and returns its owned value, freeing the node.
    ///
    /// See [`pop_front`](List::pop_front).
    pub fn pop_back(&mut self) -> Option<T> {
        self.remove_last()
            // SAFETY: a non-sigil node removed from this list always holds
            // an initialized value.
            .map(|boxed| unsafe { boxed.val.assume_init_read() })
    }

    /// Removes an arbitrary node and returns its owned value, freeing the node.
    ///
    /// # Safety
    ///
    /// `node` must be a valid, non-sigil pointer currently linked into this list.
    pub unsafe fn take(&mut self, node: *mut Node<T>) -> Option<T> {
        // SAFETY: delegated to `remove`'s contract.
        unsafe { self.remove(node) }
            // SAFETY: a non-sigil node removed from this list always holds
            // an initialized value.
            .map(|boxed| unsafe { boxed.val.assume_init_read() })
    }

    /// Removes all entries from the list, dropping each value.
    pub fn clear(&mut self) {
        while self.pop_front().is_some() {}
    }
}

impl<T> Drop for List<T> {
    fn drop(&mut self) {
        self.clear();

        // SAFETY: head/tail are valid until freed here, exactly once.
        unsafe {
            if !self.head.is_null() {
                drop(Box::from_raw(self.head));
                self.head = ptr::null_mut();
            }
            if !self.tail.is_null() {
                drop(Box::from_raw(self.tail));
                self.tail = ptr::null_mut();
            }
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for List<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("List")
            .field("capacity", &self.cap)
            .field("length", &self.len)
            .finish()
    }
}
