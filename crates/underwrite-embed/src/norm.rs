/// Smallest norm treated as non-zero.
const NORM_EPS: f32 = 1e-12;

pub fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Scale `v` to unit length in place. Zero vectors are left untouched.
pub fn l2_normalize(v: &mut [f32]) {
    let norm = l2_norm(v);
    if norm <= NORM_EPS {
        return;
    }
    for x in v.iter_mut() {
        *x /= norm;
    }
}
