/// Sum of the base-10 digits of `n`.
pub fn digit_sum(mut n: u32) -> u32 {
    let mut sum = 0;
    while n != 0 {
        sum += n % 10;
        n /= 10;
    }
    sum
}

/// Cell predicate `digit_sum(x) + digit_sum(y) < bound`.
///
/// Generation only evaluates non-negative coordinates; a negative coordinate
/// is never active.
pub fn digit_sum_below(bound: i32) -> impl Fn(i32, i32) -> bool + Send + Sync + Copy {
    move |x, y| {
        if x < 0 || y < 0 {
            return false;
        }
        let total = digit_sum(x as u32) + digit_sum(y as u32);
        (total as i64) < bound as i64
    }
}
