/// Creates a [`Vector`](crate::Vector) holding the given elements.
///
/// - `vector![]` creates an empty vector.
/// - `vector![a, b, c]` moves each element in, with capacity exactly 3.
/// - `vector![elem; n]` clones `elem` into `n` slots.
///
/// # Examples
///
/// ```
/// use av_vec::vector;
///
/// let v = vector![1, 2, 3];
/// assert_eq!(v, [1, 2, 3]);
///
/// let zeros = vector![0u8; 4];
/// assert_eq!(zeros, [0, 0, 0, 0]);
/// ```
#[macro_export]
macro_rules! vector {
    () => {
        $crate::Vector::new()
    };
    ($elem:expr; $n:expr) => {
        $crate::Vector::from_elem($elem, $n)
    };
    ($($x:expr),+ $(,)?) => {
        $crate::Vector::from([$($x),+])
    };
}
