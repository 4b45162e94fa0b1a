use uuid::Uuid;

/// Anything that hands out identifiers.
///
/// # Example
/// ```
/// use seqguid::generator::GuidGenerator;
/// use uuid::Uuid;
///
/// struct Nil;
/// impl GuidGenerator for Nil {
///     fn new_id(&self) -> Uuid {
///         Uuid::nil()
///     }
/// }
///
/// assert!(Nil.new_id().is_nil());
/// ```
pub trait GuidGenerator {
    /// Returns a new identifier. Never fails.
    fn new_id(&self) -> Uuid;
}

impl<G> GuidGenerator for &G
where
    G: GuidGenerator + ?Sized,
{
    fn new_id(&self) -> Uuid {
        (**self).new_id()
    }
}
