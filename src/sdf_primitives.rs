use glam::Vec3A;

pub fn sphere(r: f32, p: Vec3A) -> f32 {
    p.length() - r
}

pub fn plane(o: Vec3A, n: Vec3A, p: Vec3A) -> f32 {
    (p - o).dot(n)
}
