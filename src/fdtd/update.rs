//! Yee-grid update equations for the 2-D TM fields (Ez, Hx, Hy).
//!
//! Both passes write only one kind of field and read only the other, so the
//! rows of a pass are independent of each other.

use crate::fdtd::{
    coefficients::CoefficientMap,
    field::{
        FieldPartsMut,
        FieldState,
    },
};

/// Strategy for visiting the rows of one field buffer during an update pass.
pub trait RowForEach: Send + Sync + 'static {
    fn for_each_row<T, F>(&self, row_len: usize, data: &mut [T], f: F)
    where
        T: Send,
        F: Fn(usize, &mut [T]) + Send + Sync;
}

/// Rows in order on the calling thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct SingleThreaded;

impl RowForEach for SingleThreaded {
    fn for_each_row<T, F>(&self, row_len: usize, data: &mut [T], f: F)
    where
        T: Send,
        F: Fn(usize, &mut [T]) + Send + Sync,
    {
        data.chunks_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| f(y, row));
    }
}

/// Rows in parallel on a rayon thread pool.
#[cfg(feature = "rayon")]
#[derive(Clone, Debug)]
pub struct MultiThreaded {
    thread_pool: Option<std::sync::Arc<rayon::ThreadPool>>,
}

#[cfg(feature = "rayon")]
impl RowForEach for MultiThreaded {
    fn for_each_row<T, F>(&self, row_len: usize, data: &mut [T], f: F)
    where
        T: Send,
        F: Fn(usize, &mut [T]) + Send + Sync,
    {
        use rayon::{
            iter::{
                IndexedParallelIterator as _,
                ParallelIterator as _,
            },
            slice::ParallelSliceMut as _,
        };

        let mut run = || {
            data.par_chunks_mut(row_len)
                .enumerate()
                .for_each(|(y, row)| f(y, row))
        };

        if let Some(thread_pool) = &self.thread_pool {
            thread_pool.install(run);
        }
        else {
            run();
        }
    }
}

#[cfg(feature = "rayon")]
impl MultiThreaded {
    /// Runs on the global rayon pool.
    pub fn from_default_thread_pool() -> Self {
        Self { thread_pool: None }
    }

    pub fn from_num_threads(num_threads: usize) -> Result<Self, rayon::ThreadPoolBuildError> {
        Ok(Self::from_thread_pool(
            rayon::ThreadPoolBuilder::new()
                .num_threads(num_threads)
                .build()?,
        ))
    }

    pub fn from_thread_pool(thread_pool: rayon::ThreadPool) -> Self {
        Self {
            thread_pool: Some(std::sync::Arc::new(thread_pool)),
        }
    }

    pub fn num_threads(&self) -> usize {
        self.thread_pool
            .as_ref()
            .map_or_else(rayon::current_num_threads, |thread_pool| {
                thread_pool.current_num_threads()
            })
    }
}

#[cfg(feature = "rayon")]
impl Default for MultiThreaded {
    fn default() -> Self {
        Self::from_default_thread_pool()
    }
}

/// H-update.
///
/// `Hx(x, y)` for `y < N - 1` and `Hy(x, y)` for `x < N - 1`. The last row of
/// Hx and the last column of Hy are not touched.
pub fn update_magnetic<R>(threading: &R, field: &mut FieldState, coefficients: &CoefficientMap)
where
    R: RowForEach,
{
    let FieldPartsMut {
        strider, ez, hx, hy, ..
    } = field.parts_mut();
    let ez = &*ez;
    let n = strider.row_len();
    let rows = strider.size().y;
    let coefficients = coefficients.as_slice();

    threading.for_each_row(n, hx, |y, hx_row| {
        if y + 1 >= rows {
            return;
        }
        let offset = y * n;
        for (x, hx) in hx_row.iter_mut().enumerate() {
            let index = offset + x;
            let c = &coefficients[index];
            *hx = c.hx_h * *hx - c.hx_e * (ez[index + n] - ez[index]);
        }
    });

    threading.for_each_row(n, hy, |y, hy_row| {
        let offset = y * n;
        for (x, hy) in hy_row.iter_mut().enumerate().take(n.saturating_sub(1)) {
            let index = offset + x;
            let c = &coefficients[index];
            *hy = c.hy_h * *hy + c.hy_e * (ez[index + 1] - ez[index]);
        }
    });
}

/// E-update for the interior `1 <= x, y <= N - 2`. The outermost ring is left
/// to the absorbing boundary.
pub fn update_electric<R>(threading: &R, field: &mut FieldState, coefficients: &CoefficientMap)
where
    R: RowForEach,
{
    let FieldPartsMut {
        strider, ez, hx, hy, ..
    } = field.parts_mut();
    let (hx, hy) = (&*hx, &*hy);
    let n = strider.row_len();
    let rows = strider.size().y;
    let coefficients = coefficients.as_slice();

    threading.for_each_row(n, ez, |y, ez_row| {
        if y == 0 || y + 1 >= rows {
            return;
        }
        let offset = y * n;
        for x in 1..n.saturating_sub(1) {
            let index = offset + x;
            let c = &coefficients[index];
            ez_row[x] = c.ez_e * ez_row[x]
                + c.ez_h * ((hy[index] - hy[index - 1]) - (hx[index] - hx[index - n]));
        }
    });
}
