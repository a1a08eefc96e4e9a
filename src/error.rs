use thiserror::Error;

/// 链表操作中可以恢复的错误
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ListError {
    #[error("元素大小必须大于 0")]
    ZeroElementSize,
    #[error("缓冲区长度无效: 需要 {expected} 字节，实际 {actual} 字节")]
    SizeMismatch { expected: usize, actual: usize },
    #[error("节点内存分配失败: {0}")]
    AllocationFailed(#[from] AllocError),
    #[error("链表为空")]
    Empty,
}

/// 节点分配器返回的错误
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AllocError {
    #[error("内存不足，无法分配 {bytes} 字节")]
    OutOfMemory { bytes: usize },
    #[error("已达到节点数量上限 {limit}")]
    LimitReached { limit: usize },
}

/// 结构不变量 P 被破坏时的具体原因
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InvariantError {
    #[error("head 与 tail 只有一个为空")]
    HeadTailMismatch,
    #[error("头节点存在前驱")]
    HeadHasPrev,
    #[error("尾节点存在后继")]
    TailHasNext,
    #[error("节点 {node} 的前驱未指回自身")]
    BrokenBackLink { node: usize },
    #[error("链接指向已释放的槽位 {slot}")]
    DanglingLink { slot: usize },
    #[error("正向遍历未终止于 tail")]
    TailUnreachable,
    #[error("可达节点 {reachable} 个，存活节点 {live} 个")]
    OrphanedNodes { reachable: usize, live: usize },
    #[error("节点 {node} 的数据长度为 {actual}，应为 {expected}")]
    PayloadSize {
        node: usize,
        expected: usize,
        actual: usize,
    },
}
