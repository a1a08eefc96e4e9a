use std::{fmt, slice};

use crate::error::AllocError;

/// 对齐单元，保证数据区首地址按 16 字节对齐
#[repr(C, align(16))]
#[derive(Clone, Copy)]
struct Chunk([u8; PAYLOAD_ALIGN]);

/// 节点数据区的对齐字节数，C 端可以把数据区指针直接转换为任意标量或结构体指针
pub const PAYLOAD_ALIGN: usize = 16;

/// 单个节点拥有的数据区，长度在分配时确定
pub struct Payload {
    chunks: Box<[Chunk]>,
    len: usize,
}

impl Payload {
    /// 分配 `len` 字节的全零数据区，内存不足时返回错误
    pub fn try_zeroed(len: usize) -> Result<Self, AllocError> {
        let count = len.div_ceil(PAYLOAD_ALIGN);
        let mut chunks = Vec::new();
        chunks
            .try_reserve_exact(count)
            .map_err(|_| AllocError::OutOfMemory { bytes: len })?;
        chunks.resize(count, Chunk([0; PAYLOAD_ALIGN]));
        Ok(Payload {
            chunks: chunks.into_boxed_slice(),
            len,
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        // Chunk 没有填充字节，len 不超过 chunks 的总字节数
        unsafe { slice::from_raw_parts(self.chunks.as_ptr().cast::<u8>(), self.len) }
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        unsafe { slice::from_raw_parts_mut(self.chunks.as_mut_ptr().cast::<u8>(), self.len) }
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_bytes()).finish()
    }
}

/// 节点数据区的分配器
///
/// 链表每插入一个元素调用一次 `allocate`，每移除一个元素调用一次 `release`。
/// 返回的数据区长度必须恰好等于请求的 `size`。
pub trait NodeAllocator {
    fn allocate(&mut self, size: usize) -> Result<Payload, AllocError>;

    fn release(&mut self, payload: Payload);
}

/// 使用全局堆分配，分配失败时返回错误而不是终止进程
#[derive(Debug, Default, Clone, Copy)]
pub struct Global;

impl NodeAllocator for Global {
    fn allocate(&mut self, size: usize) -> Result<Payload, AllocError> {
        Payload::try_zeroed(size)
    }

    fn release(&mut self, payload: Payload) {
        drop(payload);
    }
}

/// 限制同时存活节点数量的分配器
///
/// `live` 统计已分配但尚未释放的数据区个数，达到 `limit` 后 `allocate` 失败。
#[derive(Debug, Clone)]
pub struct Bounded<A = Global> {
    inner: A,
    limit: usize,
    live: usize,
}

impl<A: NodeAllocator> Bounded<A> {
    pub fn new(inner: A, limit: usize) -> Self {
        Bounded {
            inner,
            limit,
            live: 0,
        }
    }

    pub fn unlimited(inner: A) -> Self {
        Self::new(inner, usize::MAX)
    }

    /// 当前允许同时存活的节点上限
    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn live(&self) -> usize {
        self.live
    }

    /// 调整上限，已存活的节点不受影响
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit;
    }
}

impl<A: NodeAllocator> NodeAllocator for Bounded<A> {
    fn allocate(&mut self, size: usize) -> Result<Payload, AllocError> {
        if self.live >= self.limit {
            return Err(AllocError::LimitReached { limit: self.limit });
        }
        let payload = self.inner.allocate(size)?;
        self.live += 1;
        Ok(payload)
    }

    fn release(&mut self, payload: Payload) {
        self.live = self.live.saturating_sub(1);
        self.inner.release(payload);
    }
}
