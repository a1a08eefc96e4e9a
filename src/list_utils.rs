pub mod list_utils {
    use std::cmp::Ordering;

    use tracing::trace;

    use crate::alloc::NodeAllocator;
    use crate::other_list::ByteList;

    /// 从头到尾对每个元素调用 `visitor`
    ///
    /// `visitor` 可以原地修改元素字节，借用规则保证回调中无法改动链表结构。
    pub fn for_each<A, F>(list: &mut ByteList<A>, mut visitor: F)
    where
        A: NodeAllocator,
        F: FnMut(&mut [u8]),
    {
        let mut current = list.first();
        while let Some(id) = current {
            if let Some(payload) = list.payload_mut(id) {
                visitor(payload);
            }
            current = list.next_of(id);
        }
    }

    /// 按 `cmp` 把元素排成非递减序列
    ///
    /// `cmp(a, b)` 返回 `Greater` 表示 `a` 应排在 `b` 之后。使用带交换计数的冒泡排序：
    /// 右边界从 tail 逐步前移，每一趟从 head 扫描到右边界，相邻逆序时交换两节点的
    /// 字节；某一趟没有发生交换即提前结束。节点本身不移动，因此排序不稳定。
    ///
    /// # 返回值
    /// 所有趟次的交换总数。已有序、空或单元素链表返回 0。
    pub fn sort<A, C>(list: &mut ByteList<A>, mut cmp: C) -> usize
    where
        A: NodeAllocator,
        C: FnMut(&[u8], &[u8]) -> Ordering,
    {
        let mut total = 0;
        let mut pass = 0usize;
        let mut right = list.last();

        while let Some(boundary) = right {
            let mut swaps = 0usize;
            let mut current = list.first();

            while let Some(id) = current {
                if id == boundary {
                    break;
                }
                let Some(next) = list.next_of(id) else {
                    break;
                };
                let order = match (list.payload(id), list.payload(next)) {
                    (Some(a), Some(b)) => cmp(a, b),
                    _ => break,
                };
                if order == Ordering::Greater && list.swap_payloads(id, next) {
                    swaps += 1;
                }
                current = Some(next);
            }

            trace!(pass, swaps, "sort pass finished");
            total += swaps;
            // 一趟没有交换说明已经有序
            if swaps == 0 {
                break;
            }
            right = list.prev_of(boundary);
            pass += 1;
        }

        total
    }

}
