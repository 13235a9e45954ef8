/// Scale a vector in place to unit L2 length. Zero vectors are left as-is.
pub fn l2_normalize_in_place(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in vector.iter_mut() {
            *value /= norm;
        }
    }
}
