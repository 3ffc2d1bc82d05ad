use std::sync::{Arc, Mutex, MutexGuard};

/// A thread-safe, reference-counted resource container with exclusive locking.
///
/// `MtResource` provides serialized access to a value of type `T` that is shared
/// across worker threads. It wraps an `Arc<Mutex<T>>`: every access is exclusive,
/// which is what the mesh upload hand-off needs, since the rendering layer's
/// command submission context cannot be used from two threads at once.
///
/// # Type Parameters
/// - `T`: The type of the contained resource, must be `Send`
///
/// # Examples
///
/// ## Basic Usage
/// ```
/// use marching_voxels::core::MtResource;
///
/// let counter = MtResource::new(0);
/// *counter.lock() += 1;
/// assert_eq!(*counter.lock(), 1);
/// ```
///
/// ## Sharing Between Threads
/// ```
/// # use std::thread;
/// use marching_voxels::core::MtResource;
///
/// let counter = MtResource::new(0);
/// let counter_clone = counter.clone();
///
/// let handle = thread::spawn(move || {
///     *counter_clone.lock() += 1;
/// });
///
/// handle.join().unwrap();
/// assert_eq!(*counter.lock(), 1);
/// ```
///
/// # Performance Considerations
/// - Keep the guard alive only around the shared operation itself, never
///   around per-chunk computation
pub struct MtResource<T: Send> {
    /// The shared value. Prefer [`MtResource::lock`] over locking it directly.
    pub resource: Arc<Mutex<T>>,
}

impl<T: Send> MtResource<T> {
    /// Creates a new `MtResource` containing the given value.
    ///
    /// # Arguments
    /// * `resource` - The value to be stored in the resource
    ///
    /// # Returns
    /// A new `MtResource` containing the provided value
    pub fn new(resource: T) -> Self {
        Self {
            resource: Arc::new(Mutex::new(resource)),
        }
    }

    /// Returns a guard that grants exclusive access to the contained value.
    ///
    /// # Panics
    /// Panics if the lock is poisoned, i.e. another holder panicked mid-access.
    ///
    /// # Returns
    /// A guard that provides mutable access to the contained value
    pub fn lock(&self) -> MutexGuard<'_, T> {
        self.resource.lock().unwrap()
    }
}

impl<T: Send> Clone for MtResource<T> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
        }
    }
}
