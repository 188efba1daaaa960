/// Solve `a·t² + b·t + c = 0` for real roots, returned in ascending order.
///
/// Uses the cancellation-free form `q = -½(b + sign(b)·√Δ)`, `t₀ = q/a`,
/// `t₁ = c/q`. Returns `None` when the discriminant is negative or `a` is zero.
pub fn solve_quadratic(a: f32, b: f32, c: f32) -> Option<(f32, f32)> {
    if a == 0.0 {
        return None;
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    if discriminant == 0.0 {
        let root = -0.5 * b / a;
        return Some((root, root));
    }

    let sqrt_d = discriminant.sqrt();
    let q = if b > 0.0 {
        -0.5 * (b + sqrt_d)
    } else {
        -0.5 * (b - sqrt_d)
    };

    // q != 0 here: a zero q needs both b and the discriminant to be zero
    let (t0, t1) = (q / a, c / q);

    Some(if t0 <= t1 { (t0, t1) } else { (t1, t0) })
}
