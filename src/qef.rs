use glam::Vec3A;
use std::ops::{Add, AddAssign};

/// Eigenvalues below this magnitude are treated as zero by the pseudo-inverse.
const PSEUDO_INVERSE_THRESHOLD: f32 = 0.1;
const SVD_SWEEPS: usize = 5;

/// Quadric Error Function accumulated from Hermite constraints.
///
/// `x^T A x - 2 b^T x + c`
///
/// Each constraint is a surface point with its normal; the minimizer is the
/// least-squares intersection of all constraint planes, found with a truncated
/// SVD of `A` around the mass point so that rank-deficient systems (flat or
/// creased surfaces) stay well behaved.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Qef {
    a00: f32,
    a01: f32,
    a02: f32,
    a11: f32,
    a12: f32,
    a22: f32,

    b: Vec3A,

    c: f32,

    mass_point_sum: Vec3A,
    num_points: u32,
}

impl Qef {
    /// Adds the plane through `p` with normal `n`.
    pub fn add_point(&mut self, p: Vec3A, n: Vec3A) {
        let d = p.dot(n);
        let a = self_outer_product(n.into());
        self.a00 += a[0][0];
        self.a01 += a[0][1];
        self.a02 += a[0][2];
        self.a11 += a[1][1];
        self.a12 += a[1][2];
        self.a22 += a[2][2];
        self.b += d * n;
        self.c += d * d;
        self.mass_point_sum += p;
        self.num_points += 1;
    }

    pub fn num_points(&self) -> u32 {
        self.num_points
    }

    /// Average of all constraint points.
    pub fn mass_point(&self) -> Vec3A {
        if self.num_points == 0 {
            return Vec3A::ZERO;
        }
        self.mass_point_sum / self.num_points as f32
    }

    /// Residual L2 error. `x^T A x - 2 b^T x + c`
    pub fn error(&self, p: Vec3A) -> f32 {
        p.dot(self.mul_a(p)) - 2.0 * p.dot(self.b) + self.c
    }

    pub fn minimizer(&self) -> Vec3A {
        let mass_point = self.mass_point();

        // Solve relative to the mass point; directions the pseudo-inverse
        // discards then fall back to it.
        let b = self.b - self.mul_a(mass_point);
        let (eigenvalues, v) = symmetric_eigen(self.matrix());

        let mut x = Vec3A::ZERO;
        for i in 0..3 {
            let inv = pseudo_inverse(eigenvalues[i]);
            if inv == 0.0 {
                continue;
            }
            let vi = Vec3A::new(v[0][i], v[1][i], v[2][i]);
            x += vi * (inv * vi.dot(b));
        }

        x + mass_point
    }

    fn mul_a(&self, p: Vec3A) -> Vec3A {
        Vec3A::new(
            self.a00 * p[0] + self.a01 * p[1] + self.a02 * p[2],
            self.a01 * p[0] + self.a11 * p[1] + self.a12 * p[2],
            self.a02 * p[0] + self.a12 * p[1] + self.a22 * p[2],
        )
    }

    fn matrix(&self) -> [[f32; 3]; 3] {
        [
            [self.a00, self.a01, self.a02],
            [self.a01, self.a11, self.a12],
            [self.a02, self.a12, self.a22],
        ]
    }
}

impl AddAssign<&Qef> for Qef {
    fn add_assign(&mut self, rhs: &Qef) {
        self.a00 += rhs.a00;
        self.a01 += rhs.a01;
        self.a02 += rhs.a02;
        self.a11 += rhs.a11;
        self.a12 += rhs.a12;
        self.a22 += rhs.a22;
        self.b += rhs.b;
        self.c += rhs.c;
        self.mass_point_sum += rhs.mass_point_sum;
        self.num_points += rhs.num_points;
    }
}

impl Add for Qef {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += &rhs;
        self
    }
}

fn pseudo_inverse(x: f32) -> f32 {
    if x.abs() < PSEUDO_INVERSE_THRESHOLD {
        0.0
    } else {
        1.0 / x
    }
}

/// Cyclic Jacobi eigen decomposition of a symmetric 3x3 matrix.
///
/// Returns the eigenvalues and a row-major matrix whose columns are the
/// corresponding eigenvectors.
fn symmetric_eigen(mut a: [[f32; 3]; 3]) -> ([f32; 3], [[f32; 3]; 3]) {
    let mut v = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

    for _ in 0..SVD_SWEEPS {
        for (p, q) in [(0, 1), (0, 2), (1, 2)] {
            let apq = a[p][q];
            if apq.abs() <= f32::EPSILON * (a[p][p].abs() + a[q][q].abs()) {
                a[p][q] = 0.0;
                a[q][p] = 0.0;
                continue;
            }

            let theta = (a[q][q] - a[p][p]) / (2.0 * apq);
            let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
            let c = 1.0 / (t * t + 1.0).sqrt();
            let s = t * c;

            let mut rot = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
            rot[p][p] = c;
            rot[q][q] = c;
            rot[p][q] = s;
            rot[q][p] = -s;

            a = mul(&mul(&transpose(&rot), &a), &rot);
            v = mul(&v, &rot);

            // Clear rounding residue on the annihilated pair.
            a[p][q] = 0.0;
            a[q][p] = 0.0;
        }
    }

    ([a[0][0], a[1][1], a[2][2]], v)
}

fn mul(a: &[[f32; 3]; 3], b: &[[f32; 3]; 3]) -> [[f32; 3]; 3] {
    let mut out = [[0.0; 3]; 3];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, x) in row.iter_mut().enumerate() {
            *x = (0..3).map(|k| a[i][k] * b[k][j]).sum();
        }
    }
    out
}

fn transpose(a: &[[f32; 3]; 3]) -> [[f32; 3]; 3] {
    [
        [a[0][0], a[1][0], a[2][0]],
        [a[0][1], a[1][1], a[2][1]],
        [a[0][2], a[1][2], a[2][2]],
    ]
}

fn self_outer_product([a, b, c]: [f32; 3]) -> [[f32; 3]; 3] {
    [
        [a * a, a * b, a * c],
        [a * b, b * b, b * c],
        [a * c, b * c, c * c],
    ]
}
